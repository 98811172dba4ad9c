//! Ollama configuration from TOML (`[ollama]` section)

use agora_domain::{GenerationOptions, Model};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection and decoding settings for the local Ollama service
///
/// # Example
///
/// ```toml
/// [ollama]
/// base_url = "http://localhost:11434"
/// default_model = "qwen2:0.5b"
/// request_timeout_secs = 300
/// temperature = 0.7
/// num_predict = 1500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Base URL of the service (default: "http://localhost:11434")
    pub base_url: String,
    /// Model used when the service lists no model (default: "qwen2:0.5b")
    pub default_model: String,
    /// Timeout of the liveness check (default: 2)
    pub liveness_timeout_secs: u64,
    /// Timeout of model discovery (default: 5)
    pub discovery_timeout_secs: u64,
    /// Ceiling for a whole generation (default: 300)
    pub request_timeout_secs: u64,
    /// Sampling temperature (default: 0.7)
    pub temperature: f32,
    /// Maximum number of generated tokens (default: 1500)
    pub num_predict: u32,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            base_url: "http://localhost:11434".to_string(),
            default_model: Model::DEFAULT_NAME.to_string(),
            liveness_timeout_secs: 2,
            discovery_timeout_secs: 5,
            request_timeout_secs: 300,
            temperature: options.temperature,
            num_predict: options.num_predict,
        }
    }
}

impl FileOllamaConfig {
    /// Parse the default model, `None` when the name is empty
    pub fn parse_default_model(&self) -> Option<Model> {
        Model::try_new(self.default_model.as_str())
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            num_predict: self.num_predict,
        }
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
