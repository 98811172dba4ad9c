//! Synthesis progress notification port
//!
//! Defines the interface for reporting a synthesis run as it streams.

use crate::use_cases::run_synthesis::{RunSynthesisError, SynthesisReport};
use agora_domain::Model;

/// Callback for progress updates during a synthesis run
///
/// Implementations live in the presentation layer. They are called from the
/// worker running the synthesis, so they must not touch view state directly:
/// the TUI implementation forwards every call as an event to the UI loop.
///
/// Exactly one of `on_completed`, `on_failed` or `on_cancelled` is called per run.
pub trait SynthesisProgressNotifier: Send + Sync {
    /// Called once the service is reachable and the model is chosen,
    /// right before the generation request is sent
    fn on_generation_start(&self, _model: &Model) {}

    /// Called for each text fragment, in arrival order
    fn on_chunk(&self, chunk: &str);

    /// Called when the generation finished
    fn on_completed(&self, report: &SynthesisReport);

    /// Called when the run failed
    fn on_failed(&self, error: &RunSynthesisError);

    /// Called when the run was cancelled by its caller
    fn on_cancelled(&self) {}
}

/// No-op notifier for when progress reporting is not needed
pub struct NoSynthesisProgress;

impl SynthesisProgressNotifier for NoSynthesisProgress {
    fn on_chunk(&self, _chunk: &str) {}
    fn on_completed(&self, _report: &SynthesisReport) {}
    fn on_failed(&self, _error: &RunSynthesisError) {}
}
