//! List Consultations use case.

use crate::ports::consultation_store::{ConsultationStore, StoreError};
use agora_domain::ConsultationSummary;
use std::sync::Arc;
use tracing::debug;

/// Use case backing the main view: every consultation with its contribution count.
#[derive(Clone)]
pub struct ListConsultationsUseCase {
    store: Arc<dyn ConsultationStore>,
}

impl ListConsultationsUseCase {
    pub fn new(store: Arc<dyn ConsultationStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Vec<ConsultationSummary>, StoreError> {
        let consultations = self.store.list_consultations().await?;
        debug!("Listed {} consultations", consultations.len());
        Ok(consultations)
    }
}
