//! Unified path management for vguess files.
//!
//! ```text
//! ~/.config/vguess/            # Config directory
//! └── config.toml              # Game configuration
//!
//! ~/.local/share/vguess/       # Data directory
//! └── roster.json              # Roster snapshot
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "vguess";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for vguess_core::VguessError {
    fn from(err: PathError) -> Self {
        vguess_core::VguessError::config(err.to_string())
    }
}

/// Platform-specific locations used by vguess.
pub struct VguessPaths;

impl VguessPaths {
    /// Returns the vguess configuration directory (e.g., `~/.config/vguess/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the vguess data directory (e.g., `~/.local/share/vguess/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default path of the roster snapshot.
    pub fn snapshot_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("roster.json"))
    }
}
