//! Contribution entities

use crate::consultation::entities::ConsultationId;
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Minimum number of characters (after trimming) in a contribution
pub const MIN_CONTRIBUTION_CHARS: usize = 10;

/// Identity of a stored contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionId(pub i64);

impl std::fmt::Display for ContributionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant's contribution as stored (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub consultation_id: ConsultationId,
    pub text: String,
}

/// A validated contribution that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContribution {
    consultation_id: ConsultationId,
    text: String,
}

impl NewContribution {
    /// Validate and build a new contribution.
    ///
    /// Length is counted in characters of the trimmed text.
    pub fn new(consultation_id: ConsultationId, text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyContribution);
        }
        let actual = text.chars().count();
        if actual < MIN_CONTRIBUTION_CHARS {
            return Err(ValidationError::ContributionTooShort {
                min: MIN_CONTRIBUTION_CHARS,
                actual,
            });
        }
        Ok(Self {
            consultation_id,
            text: text.to_string(),
        })
    }

    pub fn consultation_id(&self) -> ConsultationId {
        self.consultation_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
