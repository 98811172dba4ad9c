//! Ollama HTTP adapter
//!
//! Implements GenerationGateway for a local Ollama server.

pub mod gateway;
pub mod protocol;

pub use gateway::{OllamaConfig, OllamaGateway};
