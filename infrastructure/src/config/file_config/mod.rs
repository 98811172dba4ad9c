//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types at startup.

mod logging;
mod ollama;
mod storage;
mod synthesis;

pub use logging::FileLoggingConfig;
pub use ollama::FileOllamaConfig;
pub use storage::{DEFAULT_DATABASE_FILE, FileStorageConfig};
pub use synthesis::FileSynthesisConfig;

use agora_application::SynthesisParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("ollama.{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error("ollama.default_model cannot be empty")]
    EmptyModelName,

    #[error("ollama.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("ollama.temperature must be between 0 and 2, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("synthesis.language cannot be empty")]
    EmptyLanguage,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Local generation service
    pub ollama: FileOllamaConfig,
    /// Database location
    pub storage: FileStorageConfig,
    /// Prompt settings
    pub synthesis: FileSynthesisConfig,
    /// Log file location
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("liveness_timeout_secs", self.ollama.liveness_timeout_secs),
            ("discovery_timeout_secs", self.ollama.discovery_timeout_secs),
            ("request_timeout_secs", self.ollama.request_timeout_secs),
        ] {
            if value == 0 {
                issues.push(ConfigValidationError::InvalidTimeout { field });
            }
        }

        if self.ollama.parse_default_model().is_none() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if self.ollama.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyBaseUrl);
        }
        if !(0.0..=2.0).contains(&self.ollama.temperature) {
            issues.push(ConfigValidationError::TemperatureOutOfRange(
                self.ollama.temperature,
            ));
        }
        if self.synthesis.language.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyLanguage);
        }

        issues
    }

    /// Build the synthesis parameters for the application layer.
    ///
    /// An invalid default model name is replaced by the built-in default;
    /// `validate()` reports it.
    pub fn to_synthesis_params(&self) -> SynthesisParams {
        SynthesisParams::default()
            .with_default_model(self.ollama.parse_default_model().unwrap_or_default())
            .with_options(self.ollama.generation_options())
            .with_language(self.synthesis.language.trim())
    }
}
