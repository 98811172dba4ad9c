//! Synthesis configuration from TOML (`[synthesis]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSynthesisConfig {
    /// Language the synthesis is written in (default: "French")
    pub language: String,
}

impl Default for FileSynthesisConfig {
    fn default() -> Self {
        Self {
            language: "French".to_string(),
        }
    }
}
