//! Game configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::character::NumericMode;

/// Default delay between a guess and its win confirmation.
pub const DEFAULT_WIN_DELAY_MS: u64 = 4000;

/// Default roster source file name.
pub const DEFAULT_SOURCE_PATH: &str = "Vtube_bdd.csv";

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// CSV file the roster is ingested from.
    pub source_path: PathBuf,
    /// Override for the roster snapshot location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    /// Delay before a correct guess is confirmed as a win.
    pub win_delay_ms: u64,
    pub numeric_mode: NumericMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            snapshot_path: None,
            win_delay_ms: DEFAULT_WIN_DELAY_MS,
            numeric_mode: NumericMode::default(),
        }
    }
}

impl GameConfig {
    pub fn win_delay(&self) -> Duration {
        Duration::from_millis(self.win_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.win_delay(), Duration::from_secs(4));
    }

    #[test]
    fn test_partial_toml() {
        let config: GameConfig =
            toml::from_str("win_delay_ms = 250\nnumeric_mode = \"lenient\"\n").unwrap();
        assert_eq!(config.win_delay_ms, 250);
        assert_eq!(config.numeric_mode, NumericMode::Lenient);
        assert_eq!(config.source_path, PathBuf::from(DEFAULT_SOURCE_PATH));
    }
}
