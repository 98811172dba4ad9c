//! Submit Contribution use case.

use crate::ports::consultation_store::{ConsultationStore, StoreError};
use agora_domain::{ConsultationId, Contribution, NewContribution, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when submitting a contribution
#[derive(Error, Debug)]
pub enum SubmitContributionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Use case for submitting a contribution to a consultation.
///
/// The text must be non-empty and at least
/// [`MIN_CONTRIBUTION_CHARS`](agora_domain::MIN_CONTRIBUTION_CHARS) long
/// once trimmed. Nothing is written when validation fails.
#[derive(Clone)]
pub struct SubmitContributionUseCase {
    store: Arc<dyn ConsultationStore>,
}

impl SubmitContributionUseCase {
    pub fn new(store: Arc<dyn ConsultationStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        consultation_id: ConsultationId,
        text: &str,
    ) -> Result<Contribution, SubmitContributionError> {
        let new = NewContribution::new(consultation_id, text)?;
        let contribution = self.store.create_contribution(&new).await?;
        info!("Recorded contribution for consultation {}", consultation_id);
        Ok(contribution)
    }
}
