//! TUI (Text User Interface) module for agora
//!
//! Terminal UI built on ratatui: the consultation list, the consultation and
//! contribution forms, and a synthesis view that streams the generated text
//! as it arrives.

mod app;
mod event;
mod mode;
mod presenter;
mod progress;
mod state;
mod widgets;

pub use app::TuiApp;
pub use event::TuiEvent;
pub use mode::{Action, KeyContext, KeyHandler};
pub use presenter::TuiPresenter;
pub use progress::TuiProgressBridge;
pub use state::{
    CONNECTING_PLACEHOLDER, ConsultationForm, ContributionForm, Notice, Screen, SynthesisOutput,
    SynthesisView, TextField, TuiState, ViewId,
};
pub use widgets::MainLayout;
