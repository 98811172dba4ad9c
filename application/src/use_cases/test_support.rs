//! In-memory port implementations shared by the use case tests.

use crate::ports::consultation_store::{ConsultationStore, StoreError};
use crate::ports::generation_gateway::{
    GatewayError, GenerationGateway, GenerationRequest, StreamHandle,
};
use crate::ports::synthesis_progress::SynthesisProgressNotifier;
use crate::use_cases::run_synthesis::{RunSynthesisError, SynthesisReport};
use agora_domain::{
    Consultation, ConsultationId, ConsultationSummary, Contribution, ContributionId, Model,
    NewConsultation, NewContribution, StreamEvent,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

pub fn model(name: &str) -> Model {
    Model::try_new(name).unwrap()
}

// ==================== Store ====================

#[derive(Default)]
pub struct InMemoryStore {
    consultations: Mutex<Vec<Consultation>>,
    contributions: Mutex<Vec<Contribution>>,
}

impl InMemoryStore {
    pub fn seed_consultation(&self, title: &str, prompt: &str) -> ConsultationId {
        let mut consultations = self.consultations.lock().unwrap();
        let id = ConsultationId(consultations.len() as i64 + 1);
        consultations.push(Consultation {
            id,
            title: title.to_string(),
            prompt: prompt.to_string(),
        });
        id
    }

    /// Insert a contribution without validation or existence checks
    pub fn seed_contribution(&self, consultation_id: ConsultationId, text: &str) {
        let mut contributions = self.contributions.lock().unwrap();
        let id = ContributionId(contributions.len() as i64 + 1);
        contributions.push(Contribution {
            id,
            consultation_id,
            text: text.to_string(),
        });
    }
}

#[async_trait]
impl ConsultationStore for InMemoryStore {
    async fn create_consultation(
        &self,
        consultation: &NewConsultation,
    ) -> Result<Consultation, StoreError> {
        let id = self.seed_consultation(consultation.title(), consultation.prompt());
        Ok(Consultation {
            id,
            title: consultation.title().to_string(),
            prompt: consultation.prompt().to_string(),
        })
    }

    async fn list_consultations(&self) -> Result<Vec<ConsultationSummary>, StoreError> {
        let contributions = self.contributions.lock().unwrap();
        Ok(self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .map(|c| ConsultationSummary {
                id: c.id,
                title: c.title.clone(),
                prompt: c.prompt.clone(),
                contribution_count: contributions
                    .iter()
                    .filter(|x| x.consultation_id == c.id)
                    .count() as u64,
            })
            .collect())
    }

    async fn get_consultation(
        &self,
        id: ConsultationId,
    ) -> Result<Option<Consultation>, StoreError> {
        Ok(self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_contribution(
        &self,
        contribution: &NewContribution,
    ) -> Result<Contribution, StoreError> {
        let consultation_id = contribution.consultation_id();
        if !self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.id == consultation_id)
        {
            return Err(StoreError::UnknownConsultation(consultation_id));
        }
        self.seed_contribution(consultation_id, contribution.text());
        Ok(self.contributions.lock().unwrap().last().cloned().unwrap())
    }

    async fn list_contributions(
        &self,
        id: ConsultationId,
    ) -> Result<Vec<Contribution>, StoreError> {
        Ok(self
            .contributions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.consultation_id == id)
            .cloned()
            .collect())
    }

    async fn count_contributions(&self, id: ConsultationId) -> Result<u64, StoreError> {
        Ok(self.list_contributions(id).await?.len() as u64)
    }
}

// ==================== Gateway ====================

/// Scripted gateway that records every call it receives
pub struct MockGateway {
    live: bool,
    models: Result<Vec<Model>, ()>,
    events: Vec<StreamEvent>,
    generate_error: Mutex<Option<GatewayError>>,
    hold_open: bool,
    held_sender: Mutex<Option<mpsc::Sender<StreamEvent>>>,
    pub liveness_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGateway {
    pub fn streaming(events: Vec<StreamEvent>) -> Self {
        Self {
            live: true,
            models: Ok(vec![model("llama3")]),
            events,
            generate_error: Mutex::new(None),
            hold_open: false,
            held_sender: Mutex::new(None),
            liveness_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            live: false,
            ..Self::streaming(Vec::new())
        }
    }

    pub fn with_models(mut self, models: Vec<Model>) -> Self {
        self.models = Ok(models);
        self
    }

    pub fn with_failing_discovery(mut self) -> Self {
        self.models = Err(());
        self
    }

    pub fn with_generate_error(self, error: GatewayError) -> Self {
        *self.generate_error.lock().unwrap() = Some(error);
        self
    }

    /// Keep the stream open after the scripted events
    pub fn held_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationGateway for MockGateway {
    async fn check_liveness(&self) -> Result<(), GatewayError> {
        self.liveness_calls.fetch_add(1, Ordering::SeqCst);
        if self.live {
            Ok(())
        } else {
            Err(GatewayError::Unavailable("HTTP status 503".to_string()))
        }
    }

    async fn list_models(&self) -> Result<Vec<Model>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.models
            .clone()
            .map_err(|_| GatewayError::ConnectionError("refused".to_string()))
    }

    async fn generate(&self, request: GenerationRequest) -> Result<StreamHandle, GatewayError> {
        self.requests.lock().unwrap().push(request);
        if let Some(error) = self.generate_error.lock().unwrap().take() {
            return Err(error);
        }
        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in &self.events {
            tx.try_send(event.clone()).unwrap();
        }
        if self.hold_open {
            *self.held_sender.lock().unwrap() = Some(tx);
        }
        Ok(StreamHandle::new(rx))
    }
}

// ==================== Progress ====================

/// Notifier that records calls as short strings
#[derive(Default)]
pub struct RecordingProgress {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn terminal_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c.as_str(), "completed" | "failed" | "cancelled"))
            .count()
    }

    fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl SynthesisProgressNotifier for RecordingProgress {
    fn on_generation_start(&self, model: &Model) {
        self.push(format!("start:{}", model));
    }

    fn on_chunk(&self, chunk: &str) {
        self.push(format!("chunk:{}", chunk));
    }

    fn on_completed(&self, _report: &SynthesisReport) {
        self.push("completed");
    }

    fn on_failed(&self, _error: &RunSynthesisError) {
        self.push("failed");
    }

    fn on_cancelled(&self) {
        self.push("cancelled");
    }
}
