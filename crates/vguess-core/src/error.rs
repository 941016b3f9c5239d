//! Error types for the VGUESS game core.

use thiserror::Error;

/// A shared error type for the entire VGUESS workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum VguessError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", "CSV", "base64"
        message: String,
    },

    /// The raw roster source could not be fetched or turned into records
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Two roster rows normalized to the same id
    #[error("Duplicate character id: {0}")]
    DuplicateId(u32),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VguessError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Serialization error for the given format
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates an Ingestion error
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::Ingestion(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for VguessError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VguessError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("JSON", err.to_string())
    }
}

impl From<toml::de::Error> for VguessError {
    fn from(err: toml::de::Error) -> Self {
        Self::parse("TOML", err.to_string())
    }
}

impl From<base64::DecodeError> for VguessError {
    fn from(err: base64::DecodeError) -> Self {
        Self::parse("base64", err.to_string())
    }
}

/// A type alias for `Result<T, VguessError>`.
pub type Result<T> = std::result::Result<T, VguessError>;
