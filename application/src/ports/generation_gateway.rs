//! Generation Gateway port
//!
//! Defines the interface for communicating with the local text-generation service.

use agora_domain::{GenerationOptions, Model, StreamEvent};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A streamed generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: Model,
    pub prompt: String,
    pub options: GenerationOptions,
}

/// Handle for receiving streaming events from a generation.
///
/// Events arrive in the order the service produced them. Dropping the
/// handle stops the producer.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }
}

/// Gateway for the text-generation service
///
/// This port defines how the application layer talks to the inference server.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Short liveness check; `Ok` only when the service answered with success
    async fn check_liveness(&self) -> Result<(), GatewayError>;

    /// List the models the service can run
    async fn list_models(&self) -> Result<Vec<Model>, GatewayError>;

    /// Start a streamed generation.
    ///
    /// Returns once the service accepted the request; fragments then flow
    /// through the returned handle.
    async fn generate(&self, request: GenerationRequest) -> Result<StreamHandle, GatewayError>;
}
