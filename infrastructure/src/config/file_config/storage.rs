//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Database file name used when no path is configured
pub const DEFAULT_DATABASE_FILE: &str = "agora.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// SQLite database path (default: `<data dir>/agora/agora.db`)
    pub database_path: Option<PathBuf>,
}

impl FileStorageConfig {
    /// Configured path, or the default under the platform data directory
    pub fn resolved_database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .map(|d| d.join("agora").join(DEFAULT_DATABASE_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE)),
        }
    }
}
