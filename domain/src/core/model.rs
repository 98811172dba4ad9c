//! Model value object representing a locally served generation model

use serde::{Deserialize, Serialize};

/// Name of a generation model (Value Object)
///
/// Local inference servers expose arbitrary model tags such as `qwen2:0.5b`
/// or `mistral:latest`, so the model is an opaque, non-empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    /// Model used when the service cannot list its models
    pub const DEFAULT_NAME: &'static str = "qwen2:0.5b";

    /// Try to create a model name, returning None if empty
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() { None } else { Some(Self(name)) }
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Model {
    fn default() -> Self {
        Model(Self::DEFAULT_NAME.to_string())
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::try_new(s).ok_or_else(|| "model name cannot be empty".to_string())
    }
}
