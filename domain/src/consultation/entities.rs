//! Consultation entities

use crate::core::error::ValidationError;
use crate::util::truncate_chars;
use serde::{Deserialize, Serialize};

/// Identity of a stored consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(pub i64);

impl std::fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A consultation as stored (Entity)
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: ConsultationId,
    pub title: String,
    pub prompt: String,
}

/// A validated consultation that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsultation {
    title: String,
    prompt: String,
}

impl NewConsultation {
    /// Validate and build a new consultation.
    ///
    /// Both fields are trimmed; the title is checked first so the form can
    /// return focus to the first offending field.
    pub fn new(title: &str, prompt: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        Ok(Self {
            title: title.to_string(),
            prompt: prompt.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Consultation with its contribution count, as listed by the main view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationSummary {
    pub id: ConsultationId,
    pub title: String,
    pub prompt: String,
    pub contribution_count: u64,
}

impl ConsultationSummary {
    /// Maximum number of prompt characters shown on a card
    pub const PREVIEW_CHARS: usize = 120;

    /// Prompt shortened for display, with `...` appended when cut
    pub fn prompt_preview(&self) -> String {
        let preview = truncate_chars(&self.prompt, Self::PREVIEW_CHARS);
        if preview.len() < self.prompt.len() {
            format!("{}...", preview)
        } else {
            preview.to_string()
        }
    }

    /// Contribution count badge, e.g. `1 contribution` or `3 contributions`
    pub fn count_label(&self) -> String {
        let plural = if self.contribution_count == 1 { "" } else { "s" };
        format!("{} contribution{}", self.contribution_count, plural)
    }
}
