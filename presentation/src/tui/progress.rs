//! TUI Progress Bridge — SynthesisProgressNotifier → TuiEvent channel
//!
//! Runs on the synthesis worker. Converts progress callbacks into TuiEvents
//! so that view state is only ever touched by the TUI loop.

use super::event::TuiEvent;
use super::state::ViewId;
use agora_application::{RunSynthesisError, SynthesisProgressNotifier, SynthesisReport};
use agora_domain::{FailureKind, Model};
use tokio::sync::mpsc;

/// Bridge from SynthesisProgressNotifier callbacks to the TuiEvent channel
pub struct TuiProgressBridge {
    view: ViewId,
    tx: mpsc::UnboundedSender<TuiEvent>,
}

impl TuiProgressBridge {
    pub fn new(view: ViewId, tx: mpsc::UnboundedSender<TuiEvent>) -> Self {
        Self { view, tx }
    }

    fn emit(&self, event: TuiEvent) {
        // The TUI may already be gone
        let _ = self.tx.send(event);
    }
}

impl SynthesisProgressNotifier for TuiProgressBridge {
    fn on_generation_start(&self, model: &Model) {
        self.emit(TuiEvent::SynthesisStarted {
            view: self.view,
            model: model.clone(),
        });
    }

    fn on_chunk(&self, chunk: &str) {
        self.emit(TuiEvent::SynthesisChunk {
            view: self.view,
            text: chunk.to_string(),
        });
    }

    fn on_completed(&self, report: &SynthesisReport) {
        self.emit(TuiEvent::SynthesisCompleted {
            view: self.view,
            model: report.model.clone(),
            chunk_count: report.chunk_count,
        });
    }

    fn on_failed(&self, error: &RunSynthesisError) {
        let kind = error.kind().unwrap_or(FailureKind::Unexpected);
        self.emit(TuiEvent::SynthesisFailed {
            view: self.view,
            kind,
            message: error.user_message(),
            blocking: kind == FailureKind::ServiceUnavailable,
        });
    }

    fn on_cancelled(&self) {
        self.emit(TuiEvent::SynthesisCancelled { view: self.view });
    }
}
