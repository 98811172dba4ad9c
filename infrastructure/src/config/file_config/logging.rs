//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for log files written in terminal UI mode
    /// (default: `<data dir>/agora/logs`)
    pub directory: Option<PathBuf>,
}

impl FileLoggingConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|d| d.join("agora").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
        }
    }
}
