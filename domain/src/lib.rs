//! Domain layer for agora
//!
//! This crate contains the core business rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Consultation**: a named topic with a prompt, open for contributions
//! - **Contribution**: one participant's free-text answer to a consultation
//! - **Synthesis**: a model-generated structured summary of all contributions,
//!   delivered incrementally as a stream of text fragments

pub mod consultation;
pub mod contribution;
pub mod core;
pub mod synthesis;
pub mod util;

// Re-export commonly used types
pub use consultation::entities::{
    Consultation, ConsultationId, ConsultationSummary, NewConsultation,
};
pub use contribution::entities::{
    Contribution, ContributionId, MIN_CONTRIBUTION_CHARS, NewContribution,
};
pub use core::{
    error::{FormField, ValidationError},
    model::Model,
};
pub use synthesis::{
    options::GenerationOptions,
    prompt::{SynthesisPromptTemplate, contributions_block},
    status::{FailureKind, SynthesisStatus},
    stream::StreamEvent,
};
