//! Ollama wire types
//!
//! `GET /api/tags` lists models; `POST /api/generate` with `stream: true`
//! answers with newline-delimited JSON records.

use agora_domain::GenerationOptions;
use serde::{Deserialize, Serialize};

/// Body of `GET /api/tags`
#[derive(Debug, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

/// Body of `POST /api/generate`
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

impl From<GenerationOptions> for GenerateOptions {
    fn from(options: GenerationOptions) -> Self {
        Self {
            temperature: options.temperature,
            num_predict: options.num_predict,
        }
    }
}

/// One line of a streamed generation
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct GenerateRecord {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

impl GenerateRecord {
    pub fn parse(line: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(line)
    }
}
