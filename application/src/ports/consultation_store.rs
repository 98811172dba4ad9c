//! Consultation store port
//!
//! Defines the interface for persisting consultations and contributions.

use agora_domain::{
    Consultation, ConsultationId, ConsultationSummary, Contribution, NewConsultation,
    NewContribution,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Consultation {0} does not exist")]
    UnknownConsultation(ConsultationId),

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Persistence for consultations and their contributions
///
/// "Not found" is never an error: lookups return `None` or an empty list.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    /// Persist a new consultation and return it with its identity
    async fn create_consultation(
        &self,
        consultation: &NewConsultation,
    ) -> Result<Consultation, StoreError>;

    /// List all consultations with their contribution counts, oldest first
    async fn list_consultations(&self) -> Result<Vec<ConsultationSummary>, StoreError>;

    /// Get a single consultation
    async fn get_consultation(
        &self,
        id: ConsultationId,
    ) -> Result<Option<Consultation>, StoreError>;

    /// Persist a contribution.
    ///
    /// Fails with [`StoreError::UnknownConsultation`] if the consultation does not exist.
    async fn create_contribution(
        &self,
        contribution: &NewContribution,
    ) -> Result<Contribution, StoreError>;

    /// List the contributions of a consultation in a stable order
    async fn list_contributions(&self, id: ConsultationId)
    -> Result<Vec<Contribution>, StoreError>;

    /// Count the contributions of a consultation
    async fn count_contributions(&self, id: ConsultationId) -> Result<u64, StoreError>;
}
