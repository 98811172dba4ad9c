//! Synthesis lifecycle status

/// Category of a failed synthesis, used to pick the message and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service did not answer the liveness check
    ServiceUnavailable,
    /// The connection failed or broke during generation
    Connection,
    /// The generation endpoint answered with a non-success status
    ServiceError { status: u16 },
    /// Anything else
    Unexpected,
}

/// Status of a synthesis view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SynthesisStatus {
    #[default]
    Idle,
    /// Generation in progress; the trigger is disabled
    Running,
    /// Terminal: generation finished
    Done,
    /// Terminal: generation failed
    Error(FailureKind),
}

impl SynthesisStatus {
    /// Whether a new generation may be started
    pub fn can_start(&self) -> bool {
        !matches!(self, SynthesisStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SynthesisStatus::Done | SynthesisStatus::Error(_))
    }

    /// Status line text
    pub fn label(&self) -> &'static str {
        match self {
            SynthesisStatus::Idle => "",
            SynthesisStatus::Running => "Generating... (the answer is shown in real time)",
            SynthesisStatus::Done => "Synthesis complete",
            SynthesisStatus::Error(FailureKind::ServiceUnavailable)
            | SynthesisStatus::Error(FailureKind::Connection) => "Connection error",
            SynthesisStatus::Error(_) => "Error",
        }
    }
}
