//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agora_application::{
    ConsultationStore, CreateConsultationUseCase, ListConsultationsUseCase, NoSynthesisProgress,
    RunSynthesisError, RunSynthesisUseCase, SubmitContributionUseCase, SynthesisProgressNotifier,
};
use agora_domain::{ConsultationId, Model};
use agora_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, OllamaConfig, OllamaGateway,
    SqliteConsultationStore,
};
use agora_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, SynthesisStreamReporter, TuiApp,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        let details: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", details.join("\n"));
    }

    apply_overrides(&cli, &mut config);

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&cli, &config.logging)?;
    info!("Starting agora");

    // === Dependency Injection ===
    let database_path = config.storage.resolved_database_path();
    let store: Arc<dyn ConsultationStore> = Arc::new(
        SqliteConsultationStore::connect(&database_path)
            .await
            .with_context(|| format!("Failed to open database {}", database_path.display()))?,
    );
    let gateway = Arc::new(OllamaGateway::new(OllamaConfig::from(&config.ollama)));
    let synthesis = RunSynthesisUseCase::new(store.clone(), gateway)
        .with_params(config.to_synthesis_params());

    match cli.command.clone() {
        None => {
            let mut app = TuiApp::new(store, synthesis);
            app.run().await?;
        }
        Some(Command::List { output }) => {
            let consultations = ListConsultationsUseCase::new(store).execute().await?;
            match output {
                OutputFormat::Text => {
                    print!("{}", ConsoleFormatter::format_consultations(&consultations))
                }
                OutputFormat::Json => {
                    println!("{}", ConsoleFormatter::format_consultations_json(&consultations))
                }
            }
        }
        Some(Command::New { title, prompt }) => {
            let consultation = CreateConsultationUseCase::new(store)
                .execute(&title, &prompt)
                .await?;
            println!("{}", ConsoleFormatter::format_created(&consultation));
        }
        Some(Command::Contribute { id, text }) => {
            let contribution = SubmitContributionUseCase::new(store)
                .execute(ConsultationId(id), &text)
                .await?;
            println!("{}", ConsoleFormatter::format_contribution(&contribution));
        }
        Some(Command::Synthesize { id, model }) => {
            return synthesize(&cli, &synthesis, ConsultationId(id), model.as_deref()).await;
        }
        Some(Command::Models) => {
            let models = synthesis.discover_models().await;
            print!(
                "{}",
                ConsoleFormatter::format_models(&models, &synthesis.params().default_model)
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Apply command-line flags that take precedence over the configuration
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(db) = &cli.db {
        config.storage.database_path = Some(db.clone());
    }
}

/// Stream a synthesis to stdout; Ctrl+C stops it
async fn synthesize(
    cli: &Cli,
    synthesis: &RunSynthesisUseCase,
    id: ConsultationId,
    model: Option<&str>,
) -> Result<ExitCode> {
    let model = match model {
        Some(name) => Some(
            name.parse::<Model>()
                .map_err(|e| anyhow!("Invalid model: {}", e))?,
        ),
        None => None,
    };

    let input = synthesis
        .prepare(id, &format!("Consultation {}", id))
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping synthesis");
            ctrl_c_token.cancel();
        }
    });

    let progress: Box<dyn SynthesisProgressNotifier> = if cli.quiet {
        Box::new(NoSynthesisProgress)
    } else {
        Box::new(SynthesisStreamReporter::new())
    };

    match synthesis
        .execute(input, model, progress.as_ref(), &cancellation)
        .await
    {
        Ok(report) => {
            if cli.quiet {
                println!("{}", report.text);
            } else {
                eprintln!("{}", ConsoleFormatter::format_report_footer(&report));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => failure_exit_code(&e, cli.quiet),
    }
}

/// Exit status of a synthesis that did not complete.
///
/// Without `--quiet` the stream reporter has already printed the error.
fn failure_exit_code(error: &RunSynthesisError, quiet: bool) -> Result<ExitCode> {
    if error.is_cancelled() {
        Ok(ExitCode::SUCCESS)
    } else if quiet {
        bail!(error.user_message())
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Initialize tracing.
///
/// The terminal UI owns the screen, so it logs to a file under the
/// configured log directory; headless commands log to stderr.
fn init_logging(cli: &Cli, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cli.is_interactive() {
        let log_dir = logging.resolved_directory();
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        // Use tracing_appender for non-blocking file writes
        let file_appender = tracing_appender::rolling::daily(&log_dir, "agora.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_db_flag_overrides_config() {
        let cli = Cli::parse_from(["agora", "list", "--db", "/tmp/override.db"]);
        let mut config = FileConfig::default();
        config.storage.database_path = Some(PathBuf::from("/var/lib/agora/from-file.db"));

        apply_overrides(&cli, &mut config);
        assert_eq!(
            config.storage.resolved_database_path(),
            PathBuf::from("/tmp/override.db")
        );
    }

    #[test]
    fn test_failed_synthesis_exit_codes() {
        let failure = RunSynthesisError::ServiceError { status: 500 };
        assert_eq!(failure_exit_code(&failure, false).unwrap(), ExitCode::FAILURE);
        assert!(failure_exit_code(&failure, true).is_err());

        let cancelled = RunSynthesisError::Cancelled;
        assert_eq!(failure_exit_code(&cancelled, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(failure_exit_code(&cancelled, true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_config_path_kept_without_db_flag() {
        let cli = Cli::parse_from(["agora", "list"]);
        let mut config = FileConfig::default();
        config.storage.database_path = Some(PathBuf::from("/var/lib/agora/from-file.db"));

        apply_overrides(&cli, &mut config);
        assert_eq!(
            config.storage.resolved_database_path(),
            PathBuf::from("/var/lib/agora/from-file.db")
        );
    }
}
