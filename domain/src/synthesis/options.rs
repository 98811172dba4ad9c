//! Decoding parameters for generation requests

use serde::{Deserialize, Serialize};

/// Decoding parameters sent with every generation request (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of generated tokens
    pub num_predict: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            num_predict: 1500,
        }
    }
}
