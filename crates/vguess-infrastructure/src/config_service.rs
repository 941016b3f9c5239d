//! Loads [`GameConfig`] from `config.toml`.

use std::path::{Path, PathBuf};

use vguess_core::config::GameConfig;
use vguess_core::error::{Result, VguessError};

use crate::paths::VguessPaths;

/// Reads the game configuration file.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses `~/.config/vguess/config.toml` (platform equivalent elsewhere).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(VguessPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is a configuration error.
    pub fn load(&self) -> Result<GameConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {:?}, using defaults", self.path);
                return Ok(GameConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|e| {
            VguessError::config(format!("Invalid config {:?}: {}", self.path, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vguess_core::character::NumericMode;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), GameConfig::default());
    }

    #[test]
    fn test_reads_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "source_path = \"data/roster.csv\"\nwin_delay_ms = 1000\nnumeric_mode = \"lenient\"\n",
        )
        .unwrap();

        let config = ConfigService::new(path).load().unwrap();
        assert_eq!(config.source_path, PathBuf::from("data/roster.csv"));
        assert_eq!(config.win_delay_ms, 1000);
        assert_eq!(config.numeric_mode, NumericMode::Lenient);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "win_delay_ms = \"soon\"").unwrap();

        assert!(ConfigService::new(path).load().unwrap_err().is_config());
    }
}
