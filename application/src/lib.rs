//! Application layer for agora
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SynthesisParams;
pub use ports::{
    consultation_store::{ConsultationStore, StoreError},
    generation_gateway::{GatewayError, GenerationGateway, GenerationRequest, StreamHandle},
    synthesis_progress::{NoSynthesisProgress, SynthesisProgressNotifier},
};
pub use use_cases::create_consultation::{CreateConsultationError, CreateConsultationUseCase};
pub use use_cases::list_consultations::ListConsultationsUseCase;
pub use use_cases::run_synthesis::{
    RunSynthesisError, RunSynthesisUseCase, SynthesisInput, SynthesisReport,
};
pub use use_cases::submit_contribution::{SubmitContributionError, SubmitContributionUseCase};
