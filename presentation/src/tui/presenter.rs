//! TUI Presenter - Applies worker events to TUI state
//!
//! ```text
//! Synthesis worker (SynthesisProgressNotifier)
//!         ↓
//!   TuiProgressBridge → mpsc → TuiEvent
//!         ↓
//!   TuiPresenter (this module)
//!         ↓
//!   TuiState (view state) → rendering
//! ```
//!
//! Events addressed to a view that is no longer open are dropped, so a late
//! fragment from a cancelled run never reaches another view.

use super::event::TuiEvent;
use super::state::{Notice, TuiState};
use agora_domain::SynthesisStatus;
use tracing::debug;

pub struct TuiPresenter;

impl TuiPresenter {
    /// Apply one event to the state
    pub fn apply(state: &mut TuiState, event: TuiEvent) {
        let view_id = event.view();
        let Some(view) = state.synthesis_view_mut(view_id) else {
            debug!("Dropping event for closed view {:?}", view_id);
            return;
        };

        match event {
            TuiEvent::ModelsDiscovered { models, .. } => {
                view.set_models(models);
            }
            TuiEvent::SynthesisStarted { model, .. } => {
                view.active_model = Some(model);
            }
            TuiEvent::SynthesisChunk { text, .. } => {
                if view.status == SynthesisStatus::Running {
                    view.output.append(&text);
                }
            }
            TuiEvent::SynthesisCompleted {
                model, chunk_count, ..
            } => {
                view.output.finish();
                view.end(SynthesisStatus::Done);
                state.set_flash(format!(
                    "Synthesis complete ({}, {} fragments)",
                    model, chunk_count
                ));
            }
            TuiEvent::SynthesisFailed {
                kind,
                message,
                blocking,
                ..
            } => {
                view.output.fail(&message);
                view.end(SynthesisStatus::Error(kind));
                if blocking {
                    state.show_notice(Notice::new("Ollama unavailable", message));
                }
            }
            TuiEvent::SynthesisCancelled { .. } => {
                view.output.finish();
                view.end(SynthesisStatus::Idle);
            }
        }
    }
}
