//! Presentation layer for agora
//!
//! This crate contains CLI definitions, output formatters,
//! the streaming progress reporter, and the terminal UI.

pub mod cli;
pub mod output;
pub mod progress;
pub mod tui;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::SynthesisStreamReporter;
pub use tui::TuiApp;
