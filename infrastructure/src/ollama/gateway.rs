//! Ollama Generation Gateway implementation

use crate::config::FileOllamaConfig;
use crate::ollama::protocol::{GenerateRecord, GenerateRequest, TagsResponse};
use agora_application::ports::generation_gateway::{
    GatewayError, GenerationGateway, GenerationRequest, StreamHandle,
};
use agora_domain::util::truncate_chars;
use agora_domain::{Model, StreamEvent};
use async_trait::async_trait;
use futures::TryStreamExt;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;
use tracing::{debug, info, warn};

/// Capacity of the channel between the HTTP reader and the consumer
const STREAM_BUFFER: usize = 64;

/// Connection settings for [`OllamaGateway`]
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub liveness_timeout: Duration,
    pub discovery_timeout: Duration,
    /// Ceiling for a whole generation, body included
    pub request_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from(&FileOllamaConfig::default())
    }
}

impl From<&FileOllamaConfig> for OllamaConfig {
    fn from(file: &FileOllamaConfig) -> Self {
        Self {
            base_url: file.base_url.trim_end_matches('/').to_string(),
            liveness_timeout: file.liveness_timeout(),
            discovery_timeout: file.discovery_timeout(),
            request_timeout: file.request_timeout(),
        }
    }
}

/// Generation Gateway implementation for a local Ollama server
pub struct OllamaGateway {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaGateway {
    pub fn new(config: OllamaConfig) -> Self {
        info!("OllamaGateway targeting {}", config.base_url);
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

fn request_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_decode() {
        GatewayError::InvalidResponse(error.to_string())
    } else {
        GatewayError::ConnectionError(error.to_string())
    }
}

#[async_trait]
impl GenerationGateway for OllamaGateway {
    async fn check_liveness(&self) -> Result<(), GatewayError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.config.liveness_timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::Unavailable(format!("HTTP status {}", status.as_u16())))
        }
    }

    async fn list_models(&self) -> Result<Vec<Model>, GatewayError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.config.discovery_timeout)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        let tags: TagsResponse = response.json().await.map_err(request_error)?;
        Ok(tags
            .models
            .into_iter()
            .filter_map(|entry| Model::try_new(entry.name))
            .collect())
    }

    async fn generate(&self, request: GenerationRequest) -> Result<StreamHandle, GatewayError> {
        let body = GenerateRequest {
            model: request.model.as_str(),
            prompt: &request.prompt,
            stream: true,
            options: request.options.into(),
        };
        debug!(
            "POST /api/generate model={} prompt={} chars",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(self.url("/api/generate"))
            .timeout(self.config.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes_stream().map_err(io::Error::other);
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(forward_records(StreamReader::new(bytes), tx));
        Ok(StreamHandle::new(rx))
    }
}

/// Read newline-delimited generation records and forward them as events.
///
/// Malformed lines are skipped. Ends after a record flagged `done`, at end
/// of input, or as soon as the receiver is dropped.
pub(crate) async fn forward_records<R>(reader: R, tx: mpsc::Sender<StreamEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.split(b'\n');
    loop {
        let line = match lines.next_segment().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Generation stream closed without a done record");
                return;
            }
            Err(e) => {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        };

        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let record = match GenerateRecord::parse(line) {
            Ok(record) => record,
            Err(e) => {
                let raw = String::from_utf8_lossy(line);
                warn!(
                    "Skipping malformed stream record ({}): {}",
                    e,
                    truncate_chars(&raw, 80)
                );
                continue;
            }
        };

        if !record.response.is_empty()
            && tx.send(StreamEvent::Delta(record.response)).await.is_err()
        {
            return;
        }
        if record.done {
            let _ = tx.send(StreamEvent::Completed).await;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_application::ports::consultation_store::ConsultationStore;
    use agora_application::{
        NoSynthesisProgress, RunSynthesisError, RunSynthesisUseCase, SynthesisReport,
    };
    use agora_domain::{ConsultationId, GenerationOptions, NewConsultation, NewContribution};
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_util::sync::CancellationToken;

    use crate::storage::SqliteConsultationStore;

    // ==================== Record forwarding ====================

    async fn collect(input: &'static [u8]) -> Vec<StreamEvent> {
        let (tx, mut rx) = mpsc::channel(16);
        forward_records(input, tx).await;
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_forward_skips_empty_fragments() {
        let events = collect(
            b"{\"response\":\"A\",\"done\":false}\n{\"response\":\"B\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
        )
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("A".into()),
                StreamEvent::Delta("B".into()),
                StreamEvent::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_forward_skips_malformed_line() {
        let events = collect(b"this is not json\n{\"response\":\"X\",\"done\":true}\n").await;
        assert_eq!(
            events,
            vec![StreamEvent::Delta("X".into()), StreamEvent::Completed]
        );
    }

    #[tokio::test]
    async fn test_forward_stops_at_done() {
        let events = collect(
            b"{\"response\":\"A\",\"done\":true}\n{\"response\":\"ignored\",\"done\":false}\n",
        )
        .await;
        assert_eq!(
            events,
            vec![StreamEvent::Delta("A".into()), StreamEvent::Completed]
        );
    }

    #[tokio::test]
    async fn test_forward_handles_missing_trailing_newline() {
        let events = collect(b"\r\n{\"response\":\"tail\",\"done\":false}").await;
        assert_eq!(events, vec![StreamEvent::Delta("tail".into())]);
    }

    // ==================== HTTP ====================

    struct MockOllama {
        tags_status: StatusCode,
        tags_body: &'static str,
        generate_status: StatusCode,
        generate_body: &'static str,
        generate_calls: AtomicUsize,
        generate_bodies: Mutex<Vec<serde_json::Value>>,
    }

    impl MockOllama {
        fn new(generate_body: &'static str) -> Self {
            Self {
                tags_status: StatusCode::OK,
                tags_body: r#"{"models":[{"name":"llama3:8b"},{"name":"qwen2:0.5b"}]}"#,
                generate_status: StatusCode::OK,
                generate_body,
                generate_calls: AtomicUsize::new(0),
                generate_bodies: Mutex::new(Vec::new()),
            }
        }
    }

    async fn tags(State(mock): State<Arc<MockOllama>>) -> (StatusCode, &'static str) {
        (mock.tags_status, mock.tags_body)
    }

    async fn generate(
        State(mock): State<Arc<MockOllama>>,
        axum::Json(body): axum::Json<serde_json::Value>,
    ) -> (StatusCode, &'static str) {
        mock.generate_calls.fetch_add(1, Ordering::SeqCst);
        mock.generate_bodies.lock().unwrap().push(body);
        (mock.generate_status, mock.generate_body)
    }

    async fn serve(mock: Arc<MockOllama>) -> OllamaGateway {
        let app = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(mock);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        OllamaGateway::new(OllamaConfig {
            base_url: format!("http://{}", addr),
            ..OllamaConfig::default()
        })
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            model: Model::default(),
            prompt: prompt.to_string(),
            options: GenerationOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_liveness_and_models() {
        let gateway = serve(Arc::new(MockOllama::new(""))).await;

        assert!(gateway.check_liveness().await.is_ok());
        let models = gateway.list_models().await.unwrap();
        let names: Vec<&str> = models.iter().map(Model::as_str).collect();
        assert_eq!(names, vec!["llama3:8b", "qwen2:0.5b"]);
    }

    #[tokio::test]
    async fn test_liveness_non_success() {
        let mock = MockOllama {
            tags_status: StatusCode::SERVICE_UNAVAILABLE,
            ..MockOllama::new("")
        };
        let gateway = serve(Arc::new(mock)).await;

        let err = gateway.check_liveness().await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = OllamaGateway::new(OllamaConfig {
            base_url: format!("http://{}", addr),
            ..OllamaConfig::default()
        });
        assert!(matches!(
            gateway.check_liveness().await,
            Err(GatewayError::Unavailable(_))
        ));
        assert!(gateway.list_models().await.is_err());
    }

    #[tokio::test]
    async fn test_generate_streams_fragments() {
        let mock = Arc::new(MockOllama::new(
            "{\"response\":\"A\",\"done\":false}\n{\"response\":\"B\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
        ));
        let gateway = serve(mock.clone()).await;

        let mut handle = gateway.generate(request("Say AB")).await.unwrap();
        let mut events = Vec::new();
        while let Some(event) = handle.receiver.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("A".into()),
                StreamEvent::Delta("B".into()),
                StreamEvent::Completed,
            ]
        );

        let bodies = mock.generate_bodies.lock().unwrap();
        assert_eq!(bodies[0]["model"], "qwen2:0.5b");
        assert_eq!(bodies[0]["prompt"], "Say AB");
        assert_eq!(bodies[0]["stream"], true);
        assert_eq!(bodies[0]["options"]["num_predict"], 1500);
    }

    #[tokio::test]
    async fn test_generate_non_success_status() {
        let mock = MockOllama {
            generate_status: StatusCode::INTERNAL_SERVER_ERROR,
            ..MockOllama::new("boom")
        };
        let gateway = serve(Arc::new(mock)).await;

        assert!(matches!(
            gateway.generate(request("x")).await,
            Err(GatewayError::Status { status: 500 })
        ));
    }

    // ==================== End to end ====================

    async fn seeded_store() -> (Arc<SqliteConsultationStore>, ConsultationId) {
        let store = SqliteConsultationStore::in_memory().await.unwrap();
        let consultation = store
            .create_consultation(&NewConsultation::new("Markets", "Weekly or daily?").unwrap())
            .await
            .unwrap();
        store
            .create_contribution(
                &NewContribution::new(consultation.id, "Daily markets in summer").unwrap(),
            )
            .await
            .unwrap();
        (Arc::new(store), consultation.id)
    }

    async fn synthesize(mock: Arc<MockOllama>) -> Result<SynthesisReport, RunSynthesisError> {
        let gateway = serve(mock).await;
        let (store, id) = seeded_store().await;
        let use_case = RunSynthesisUseCase::new(store, Arc::new(gateway));
        let input = use_case.prepare(id, "Markets").await.unwrap();
        use_case
            .execute(input, None, &NoSynthesisProgress, &CancellationToken::new())
            .await
    }

    #[tokio::test]
    async fn test_flow_malformed_line_then_fragment() {
        let mock = Arc::new(MockOllama::new("garbage\n{\"response\":\"X\",\"done\":true}\n"));
        let report = synthesize(mock).await.unwrap();
        assert_eq!(report.text, "X");
        assert_eq!(report.model.as_str(), "llama3:8b");
    }

    #[tokio::test]
    async fn test_flow_liveness_failure_never_generates() {
        let mock = Arc::new(MockOllama {
            tags_status: StatusCode::NOT_FOUND,
            ..MockOllama::new("{\"response\":\"X\",\"done\":true}\n")
        });
        let err = synthesize(mock.clone()).await.unwrap_err();

        assert!(matches!(err, RunSynthesisError::ServiceUnavailable(_)));
        assert_eq!(mock.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_flow_empty_model_list_uses_default() {
        let mock = Arc::new(MockOllama {
            tags_body: r#"{"models":[]}"#,
            ..MockOllama::new("{\"response\":\"ok\",\"done\":true}\n")
        });
        let report = synthesize(mock.clone()).await.unwrap();

        assert_eq!(report.model, Model::default());
        assert_eq!(
            mock.generate_bodies.lock().unwrap()[0]["model"],
            Model::DEFAULT_NAME
        );
    }

    #[tokio::test]
    async fn test_flow_service_error_names_status() {
        let mock = Arc::new(MockOllama {
            generate_status: StatusCode::BAD_GATEWAY,
            ..MockOllama::new("")
        });
        let err = synthesize(mock).await.unwrap_err();
        assert!(err.user_message().contains("502"));
    }
}
