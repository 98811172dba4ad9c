//! TUI event types
//!
//! Events coming FROM background workers (model discovery, synthesis runs)
//! back to the TUI loop through the mpsc channel.

use super::state::ViewId;
use agora_domain::{FailureKind, Model};

/// Events emitted by workers and the TuiProgressBridge for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // -- Model discovery --
    ModelsDiscovered {
        view: ViewId,
        models: Vec<Model>,
    },

    // -- Synthesis run --
    SynthesisStarted {
        view: ViewId,
        model: Model,
    },
    SynthesisChunk {
        view: ViewId,
        text: String,
    },
    SynthesisCompleted {
        view: ViewId,
        model: Model,
        chunk_count: usize,
    },
    SynthesisFailed {
        view: ViewId,
        kind: FailureKind,
        message: String,
        /// Also shown as a blocking notice
        blocking: bool,
    },
    SynthesisCancelled {
        view: ViewId,
    },
}

impl TuiEvent {
    /// View the event belongs to
    pub fn view(&self) -> ViewId {
        match self {
            TuiEvent::ModelsDiscovered { view, .. }
            | TuiEvent::SynthesisStarted { view, .. }
            | TuiEvent::SynthesisChunk { view, .. }
            | TuiEvent::SynthesisCompleted { view, .. }
            | TuiEvent::SynthesisFailed { view, .. }
            | TuiEvent::SynthesisCancelled { view } => *view,
        }
    }
}
