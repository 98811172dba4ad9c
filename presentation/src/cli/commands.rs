//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Citizen consultations with locally generated syntheses")]
#[command(long_about = r#"
Agora collects citizen contributions on open consultations and produces a
structured synthesis of them with a model served by a local Ollama instance.

Without a subcommand, the terminal UI starts.

Configuration files are loaded from (in priority order):
1. AGORA_<SECTION>__<KEY>   Environment variables
2. --config <path>          Explicit config file
3. ./agora.toml             Project-level config
4. ~/.config/agora/config.toml   Global config

Example:
  agora
  agora new --title "Parks" --prompt "What should change in our parks?"
  agora contribute 1 "More benches along the river, please."
  agora synthesize 1 --model qwen2:0.5b
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the SQLite database (overrides the configuration)
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List consultations with their contribution counts
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Create a consultation
    New {
        /// Consultation title
        #[arg(long)]
        title: String,

        /// Question or theme put to the participants
        #[arg(long)]
        prompt: String,
    },

    /// Add a contribution to a consultation
    Contribute {
        /// Consultation id (see `agora list`)
        id: i64,

        /// Contribution text
        text: String,
    },

    /// Stream a synthesis of a consultation's contributions
    Synthesize {
        /// Consultation id (see `agora list`)
        id: i64,

        /// Model to use (defaults to the first model the service reports)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// List the models the service can run
    Models,
}

impl Cli {
    /// Whether this invocation runs the terminal UI
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }
}
