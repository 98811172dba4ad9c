//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod ollama;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOllamaConfig,
    FileStorageConfig, FileSynthesisConfig,
};
pub use ollama::{OllamaConfig, OllamaGateway};
pub use storage::SqliteConsultationStore;
