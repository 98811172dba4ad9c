//! Create Consultation use case.

use crate::ports::consultation_store::{ConsultationStore, StoreError};
use agora_domain::{Consultation, NewConsultation, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when creating a consultation
#[derive(Error, Debug)]
pub enum CreateConsultationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Use case for creating a consultation from form input.
///
/// Validates the title and prompt, then persists the consultation.
/// Nothing is written when validation fails.
#[derive(Clone)]
pub struct CreateConsultationUseCase {
    store: Arc<dyn ConsultationStore>,
}

impl CreateConsultationUseCase {
    pub fn new(store: Arc<dyn ConsultationStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        title: &str,
        prompt: &str,
    ) -> Result<Consultation, CreateConsultationError> {
        let new = NewConsultation::new(title, prompt)?;
        let consultation = self.store.create_consultation(&new).await?;
        info!(
            "Created consultation {} ({})",
            consultation.id, consultation.title
        );
        Ok(consultation)
    }
}
