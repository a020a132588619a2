//! Plugin configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default data folder, relative to the server's working directory
pub const DEFAULT_DATA_DIR: &str = "plugins/NoFear";

/// Default snapshot file name for the player state table
pub const DEFAULT_STATE_FILE: &str = "playerInvincibleState.bin";

/// Plugin configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Persistence configuration
    pub persistence: PersistenceConfig,
    /// Autosave configuration
    pub autosave: AutosaveConfig,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Folder holding the plugin's snapshot files
    pub data_dir: PathBuf,
    /// File name of the player state snapshot inside `data_dir`
    pub state_file: String,
}

/// Autosave configuration
#[derive(Debug, Clone, Default)]
pub struct AutosaveConfig {
    /// Interval between periodic checkpoints; `None` disables autosave
    pub interval: Option<Duration>,
}

impl PersistenceConfig {
    /// Full path of the player state snapshot
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            state_file: DEFAULT_STATE_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            persistence: PersistenceConfig {
                data_dir: env::var_os("NOFEAR_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
                state_file: env::var("NOFEAR_STATE_FILE")
                    .ok()
                    .filter(|f| !f.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string()),
            },
            autosave: AutosaveConfig {
                interval: env::var("NOFEAR_AUTOSAVE_SECS")
                    .ok()
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            },
        }
    }
}
