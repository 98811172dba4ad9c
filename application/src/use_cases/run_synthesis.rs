//! Run Synthesis use case.
//!
//! Produces a structured synthesis of a consultation's contributions by
//! streaming a generation from the local text-generation service.
//!
//! Flow of a run:
//! 1. Liveness check; an unreachable service fails fast without generating
//! 2. Model discovery when no model was chosen, falling back to the
//!    configured default
//! 3. Prompt construction from the consultation and its contributions
//! 4. Streamed generation, forwarding every non-empty fragment in order
//!
//! The notifier receives exactly one terminal call per run.

use crate::config::SynthesisParams;
use crate::ports::consultation_store::{ConsultationStore, StoreError};
use crate::ports::generation_gateway::{GatewayError, GenerationGateway, GenerationRequest};
use crate::ports::synthesis_progress::SynthesisProgressNotifier;
use agora_domain::{
    Consultation, ConsultationId, Contribution, FailureKind, Model, StreamEvent,
};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a synthesis run
#[derive(Error, Debug)]
pub enum RunSynthesisError {
    #[error("Consultation {0} has no contributions")]
    NoContributions(ConsultationId),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Service answered with HTTP status {status}")]
    ServiceError { status: u16 },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Synthesis cancelled")]
    Cancelled,
}

impl RunSynthesisError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunSynthesisError::Cancelled)
    }

    /// Failure category shown by the status line.
    ///
    /// `None` for outcomes that are not failures of a run: a refused start
    /// (no contributions) or a cancellation.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            RunSynthesisError::NoContributions(_) | RunSynthesisError::Cancelled => None,
            RunSynthesisError::ServiceUnavailable(_) => Some(FailureKind::ServiceUnavailable),
            RunSynthesisError::ServiceError { status } => {
                Some(FailureKind::ServiceError { status: *status })
            }
            RunSynthesisError::Connection(_) => Some(FailureKind::Connection),
            RunSynthesisError::Store(_) | RunSynthesisError::Unexpected(_) => {
                Some(FailureKind::Unexpected)
            }
        }
    }

    /// Human-readable message for notices and the output area
    pub fn user_message(&self) -> String {
        match self {
            RunSynthesisError::NoContributions(_) => {
                "This consultation has no contributions yet. Add at least one before \
                 requesting a synthesis."
                    .to_string()
            }
            RunSynthesisError::ServiceUnavailable(detail) => format!(
                "The Ollama service is not reachable ({}).\n\
                 Make sure it is running (`ollama serve`) and that a model is installed \
                 (`ollama pull {}`).",
                detail,
                Model::DEFAULT_NAME
            ),
            RunSynthesisError::ServiceError { status } => {
                format!("Ollama error: the service answered with HTTP status {}.", status)
            }
            RunSynthesisError::Connection(detail) => format!(
                "Connection error: could not talk to Ollama ({}).",
                detail
            ),
            RunSynthesisError::Store(e) => format!("Could not read the consultation: {}", e),
            RunSynthesisError::Unexpected(detail) => format!("Unexpected error: {}", detail),
            RunSynthesisError::Cancelled => "Synthesis cancelled.".to_string(),
        }
    }
}

impl From<GatewayError> for RunSynthesisError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Status { status } => RunSynthesisError::ServiceError { status },
            GatewayError::Unavailable(_)
            | GatewayError::ConnectionError(_)
            | GatewayError::Timeout => RunSynthesisError::Connection(error.to_string()),
            GatewayError::InvalidResponse(_) => RunSynthesisError::Unexpected(error.to_string()),
        }
    }
}

/// A consultation ready to be synthesized.
///
/// Always holds at least one contribution.
#[derive(Debug, Clone)]
pub struct SynthesisInput {
    consultation: Consultation,
    contributions: Vec<Contribution>,
}

impl SynthesisInput {
    pub fn new(
        consultation: Consultation,
        contributions: Vec<Contribution>,
    ) -> Result<Self, RunSynthesisError> {
        if contributions.is_empty() {
            return Err(RunSynthesisError::NoContributions(consultation.id));
        }
        Ok(Self {
            consultation,
            contributions,
        })
    }

    pub fn consultation(&self) -> &Consultation {
        &self.consultation
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisReport {
    pub model: Model,
    pub text: String,
    /// Number of non-empty fragments received
    pub chunk_count: usize,
}

/// Use case for synthesizing a consultation.
#[derive(Clone)]
pub struct RunSynthesisUseCase {
    store: Arc<dyn ConsultationStore>,
    gateway: Arc<dyn GenerationGateway>,
    params: SynthesisParams,
}

impl RunSynthesisUseCase {
    pub fn new(store: Arc<dyn ConsultationStore>, gateway: Arc<dyn GenerationGateway>) -> Self {
        Self {
            store,
            gateway,
            params: SynthesisParams::default(),
        }
    }

    pub fn with_params(mut self, params: SynthesisParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &SynthesisParams {
        &self.params
    }

    /// Refuse early when a consultation has nothing to synthesize.
    ///
    /// Only the store is consulted. Returns the number of contributions.
    pub async fn ensure_contributions(
        &self,
        id: ConsultationId,
    ) -> Result<u64, RunSynthesisError> {
        let count = self.store.count_contributions(id).await?;
        if count == 0 {
            info!("Consultation {} has no contributions, refusing synthesis", id);
            return Err(RunSynthesisError::NoContributions(id));
        }
        Ok(count)
    }

    /// Load a consultation and its contributions.
    ///
    /// Refuses with [`RunSynthesisError::NoContributions`] when nothing was
    /// contributed; no service call happens in that case. A consultation
    /// missing from the store is not fatal: `title_hint` stands in for its title.
    pub async fn prepare(
        &self,
        id: ConsultationId,
        title_hint: &str,
    ) -> Result<SynthesisInput, RunSynthesisError> {
        let contributions = self.store.list_contributions(id).await?;
        if contributions.is_empty() {
            info!("Consultation {} has no contributions, not synthesizing", id);
            return Err(RunSynthesisError::NoContributions(id));
        }

        let consultation = match self.store.get_consultation(id).await? {
            Some(consultation) => consultation,
            None => {
                warn!("Consultation {} not found, using the displayed title", id);
                Consultation {
                    id,
                    title: title_hint.to_string(),
                    prompt: String::new(),
                }
            }
        };

        SynthesisInput::new(consultation, contributions)
    }

    /// List the models the service can run.
    ///
    /// Never empty: falls back to the configured default model when the
    /// service cannot be queried or reports no model.
    pub async fn discover_models(&self) -> Vec<Model> {
        match self.gateway.list_models().await {
            Ok(models) if !models.is_empty() => {
                debug!("Discovered {} models", models.len());
                models
            }
            Ok(_) => {
                warn!(
                    "Service reported no models, falling back to {}",
                    self.params.default_model
                );
                vec![self.params.default_model.clone()]
            }
            Err(e) => {
                warn!(
                    "Model discovery failed ({}), falling back to {}",
                    e, self.params.default_model
                );
                vec![self.params.default_model.clone()]
            }
        }
    }

    /// Run a synthesis, streaming fragments to `progress`.
    ///
    /// When `model` is `None` the first discovered model is used. Cancelling
    /// `cancellation` stops the run at the next await point and drops the
    /// stream.
    pub async fn execute(
        &self,
        input: SynthesisInput,
        model: Option<Model>,
        progress: &dyn SynthesisProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<SynthesisReport, RunSynthesisError> {
        let result = self.run(input, model, progress, cancellation).await;
        match &result {
            Ok(report) => {
                info!(
                    "Synthesis complete: {} fragments, {} chars",
                    report.chunk_count,
                    report.text.len()
                );
                progress.on_completed(report);
            }
            Err(RunSynthesisError::Cancelled) => {
                info!("Synthesis cancelled");
                progress.on_cancelled();
            }
            Err(e) => {
                warn!("Synthesis failed: {}", e);
                progress.on_failed(e);
            }
        }
        result
    }

    async fn run(
        &self,
        input: SynthesisInput,
        model: Option<Model>,
        progress: &dyn SynthesisProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<SynthesisReport, RunSynthesisError> {
        let consultation = input.consultation();
        info!(
            "Starting synthesis of consultation {} ({} contributions)",
            consultation.id,
            input.contributions().len()
        );

        cancellable(cancellation, self.gateway.check_liveness())
            .await?
            .map_err(|e| RunSynthesisError::ServiceUnavailable(e.to_string()))?;

        let model = match model {
            Some(model) => model,
            None => cancellable(cancellation, self.discover_models())
                .await?
                .into_iter()
                .next()
                .unwrap_or_else(|| self.params.default_model.clone()),
        };

        let prompt = self
            .params
            .template
            .render(consultation, input.contributions());
        debug!("Synthesis prompt: {} chars, model {}", prompt.len(), model);

        progress.on_generation_start(&model);
        let request = GenerationRequest {
            model: model.clone(),
            prompt,
            options: self.params.options,
        };
        let handle = cancellable(cancellation, self.gateway.generate(request)).await??;
        let mut receiver = handle.receiver;

        let mut text = String::new();
        let mut chunk_count = 0;
        loop {
            let event = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Err(RunSynthesisError::Cancelled),
                event = receiver.recv() => event,
            };

            match event {
                Some(StreamEvent::Delta(chunk)) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    progress.on_chunk(&chunk);
                    text.push_str(&chunk);
                    chunk_count += 1;
                }
                Some(StreamEvent::Completed) => break,
                Some(StreamEvent::Error(e)) => return Err(RunSynthesisError::Connection(e)),
                None => break, // connection closed
            }
        }

        Ok(SynthesisReport {
            model,
            text,
            chunk_count,
        })
    }
}

/// Await `future` unless `token` is cancelled first
async fn cancellable<T>(
    token: &CancellationToken,
    future: impl Future<Output = T>,
) -> Result<T, RunSynthesisError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(RunSynthesisError::Cancelled),
        output = future => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{InMemoryStore, MockGateway, RecordingProgress, model};
    use std::sync::atomic::Ordering;

    fn delta(text: &str) -> StreamEvent {
        StreamEvent::Delta(text.to_string())
    }

    fn store_with(contributions: &[&str]) -> (Arc<InMemoryStore>, ConsultationId) {
        let store = Arc::new(InMemoryStore::default());
        let id = store.seed_consultation("Bike lanes", "Where should new lanes go?");
        for text in contributions {
            store.seed_contribution(id, text);
        }
        (store, id)
    }

    async fn run(
        gateway: Arc<MockGateway>,
        model: Option<Model>,
    ) -> (Result<SynthesisReport, RunSynthesisError>, RecordingProgress) {
        let (store, id) = store_with(&["Along the river please", "Near every school"]);
        let use_case = RunSynthesisUseCase::new(store, gateway);
        let input = use_case.prepare(id, "Bike lanes").await.unwrap();
        let progress = RecordingProgress::default();
        let result = use_case
            .execute(input, model, &progress, &CancellationToken::new())
            .await;
        (result, progress)
    }

    // ==================== prepare ====================

    #[tokio::test]
    async fn test_no_contributions_refused_without_network() {
        let (store, id) = store_with(&[]);
        let gateway = Arc::new(MockGateway::streaming(vec![]));
        let use_case = RunSynthesisUseCase::new(store, gateway.clone());

        let err = use_case.prepare(id, "Bike lanes").await.unwrap_err();
        assert!(matches!(err, RunSynthesisError::NoContributions(found) if found == id));
        assert!(err.kind().is_none());
        assert_eq!(gateway.liveness_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.generate_calls(), 0);
    }

    #[tokio::test]
    async fn test_ensure_contributions_counts_without_network() {
        let (empty_store, empty_id) = store_with(&[]);
        let gateway = Arc::new(MockGateway::streaming(vec![]));
        let use_case = RunSynthesisUseCase::new(empty_store, gateway.clone());
        let err = use_case.ensure_contributions(empty_id).await.unwrap_err();
        assert!(matches!(err, RunSynthesisError::NoContributions(found) if found == empty_id));

        let (store, id) = store_with(&["Along the river please", "Near every school"]);
        let use_case = RunSynthesisUseCase::new(store, gateway.clone());
        assert_eq!(use_case.ensure_contributions(id).await.unwrap(), 2);

        assert_eq!(gateway.liveness_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_consultation_uses_title_hint() {
        let store = Arc::new(InMemoryStore::default());
        store.seed_contribution(ConsultationId(42), "Orphan contribution text");
        let use_case =
            RunSynthesisUseCase::new(store, Arc::new(MockGateway::streaming(vec![])));

        let input = use_case.prepare(ConsultationId(42), "Shown title").await.unwrap();
        assert_eq!(input.consultation().title, "Shown title");
        assert_eq!(input.contributions().len(), 1);
    }

    #[test]
    fn test_input_requires_contributions() {
        let consultation = Consultation {
            id: ConsultationId(1),
            title: "T".to_string(),
            prompt: "P".to_string(),
        };
        assert!(matches!(
            SynthesisInput::new(consultation, vec![]),
            Err(RunSynthesisError::NoContributions(ConsultationId(1)))
        ));
    }

    // ==================== discover_models ====================

    #[tokio::test]
    async fn test_discovery_falls_back_to_default() {
        let (store, _) = store_with(&[]);
        let failing = RunSynthesisUseCase::new(
            store.clone(),
            Arc::new(MockGateway::streaming(vec![]).with_failing_discovery()),
        );
        assert_eq!(failing.discover_models().await, vec![Model::default()]);

        let empty = RunSynthesisUseCase::new(
            store,
            Arc::new(MockGateway::streaming(vec![]).with_models(vec![])),
        )
        .with_params(SynthesisParams::default().with_default_model(model("custom:1b")));
        assert_eq!(empty.discover_models().await, vec![model("custom:1b")]);
    }

    // ==================== execute ====================

    #[tokio::test]
    async fn test_fragments_concatenated_in_order() {
        let gateway = Arc::new(MockGateway::streaming(vec![
            delta("A"),
            delta("B"),
            delta(""),
            StreamEvent::Completed,
        ]));
        let (result, progress) = run(gateway.clone(), None).await;

        let report = result.unwrap();
        assert_eq!(report.text, "AB");
        assert_eq!(report.chunk_count, 2);
        assert_eq!(report.model, model("llama3"));
        assert_eq!(
            progress.calls(),
            vec!["start:llama3", "chunk:A", "chunk:B", "completed"]
        );
    }

    #[tokio::test]
    async fn test_prompt_embeds_labeled_contributions() {
        let gateway = Arc::new(MockGateway::streaming(vec![StreamEvent::Completed]));
        let (result, _) = run(gateway.clone(), None).await;
        assert!(result.is_ok());

        let requests = gateway.requests.lock().unwrap();
        let prompt = &requests[0].prompt;
        assert!(prompt.contains("Bike lanes"));
        assert!(prompt.contains("Where should new lanes go?"));
        assert!(prompt.contains("Contribution 1:\nAlong the river please"));
        assert!(prompt.contains("---"));
        assert!(prompt.contains("Contribution 2:\nNear every school"));
        assert_eq!(requests[0].options.num_predict, 1500);
    }

    #[tokio::test]
    async fn test_stream_closed_without_done_completes() {
        let gateway = Arc::new(MockGateway::streaming(vec![delta("partial")]));
        let (result, progress) = run(gateway, None).await;
        assert_eq!(result.unwrap().text, "partial");
        assert_eq!(progress.terminal_calls(), 1);
    }

    #[tokio::test]
    async fn test_liveness_failure_skips_generation() {
        let gateway = Arc::new(MockGateway::unreachable());
        let (result, progress) = run(gateway.clone(), None).await;

        let err = result.unwrap_err();
        assert!(matches!(err, RunSynthesisError::ServiceUnavailable(_)));
        assert_eq!(err.kind(), Some(FailureKind::ServiceUnavailable));
        assert!(err.user_message().contains("not reachable"));
        assert_eq!(gateway.generate_calls(), 0);
        assert_eq!(progress.calls(), vec!["failed"]);
    }

    #[tokio::test]
    async fn test_empty_model_list_uses_default() {
        let gateway = Arc::new(MockGateway::streaming(vec![StreamEvent::Completed]).with_models(vec![]));
        let (result, _) = run(gateway.clone(), None).await;

        assert_eq!(result.unwrap().model, Model::default());
        assert_eq!(gateway.requests.lock().unwrap()[0].model, Model::default());
    }

    #[tokio::test]
    async fn test_explicit_model_skips_discovery() {
        let gateway = Arc::new(MockGateway::streaming(vec![StreamEvent::Completed]));
        let (result, _) = run(gateway.clone(), Some(model("mistral"))).await;

        assert_eq!(result.unwrap().model, model("mistral"));
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_error_names_status() {
        let gateway = Arc::new(
            MockGateway::streaming(vec![])
                .with_generate_error(GatewayError::Status { status: 500 }),
        );
        let (result, progress) = run(gateway, None).await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::ServiceError { status: 500 }));
        assert!(err.user_message().contains("500"));
        assert_eq!(progress.terminal_calls(), 1);
    }

    #[tokio::test]
    async fn test_broken_stream_is_connection_error() {
        let gateway = Arc::new(MockGateway::streaming(vec![
            delta("A"),
            StreamEvent::Error("connection reset".to_string()),
        ]));
        let (result, progress) = run(gateway, None).await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), Some(FailureKind::Connection));
        assert_eq!(progress.calls().last().map(String::as_str), Some("failed"));
        assert_eq!(progress.terminal_calls(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_open_stream() {
        let (store, id) = store_with(&["A contribution long enough"]);
        let gateway = Arc::new(MockGateway::streaming(vec![delta("A")]).held_open());
        let use_case = RunSynthesisUseCase::new(store, gateway);
        let input = use_case.prepare(id, "Bike lanes").await.unwrap();
        let progress = RecordingProgress::default();
        let token = CancellationToken::new();

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let result = use_case.execute(input, None, &progress, &token).await;
        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(
            progress.calls(),
            vec!["start:llama3", "chunk:A", "cancelled"]
        );
    }

    #[test]
    fn test_gateway_error_mapping() {
        assert!(matches!(
            RunSynthesisError::from(GatewayError::Timeout),
            RunSynthesisError::Connection(_)
        ));
        assert!(matches!(
            RunSynthesisError::from(GatewayError::InvalidResponse("x".into())),
            RunSynthesisError::Unexpected(_)
        ));
        assert!(matches!(
            RunSynthesisError::from(GatewayError::Status { status: 404 }),
            RunSynthesisError::ServiceError { status: 404 }
        ));
    }
}
