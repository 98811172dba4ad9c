//! Configuration file loading for agora
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables: `AGORA_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./agora.toml` or `./.agora.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agora/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_DATABASE_FILE, FileConfig, FileLoggingConfig,
    FileOllamaConfig, FileStorageConfig, FileSynthesisConfig,
};
pub use loader::ConfigLoader;
