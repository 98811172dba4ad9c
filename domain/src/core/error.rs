//! Domain error types

use thiserror::Error;

/// Input field a validation error refers to.
///
/// Forms use this to return focus to the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Prompt,
    ContributionText,
}

/// Validation errors raised when building new consultations or contributions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a title for the consultation.")]
    EmptyTitle,

    #[error("Please enter a question or theme for the participants.")]
    EmptyPrompt,

    #[error("Please write your contribution.")]
    EmptyContribution,

    #[error("Your contribution must contain at least {min} characters (currently {actual}).")]
    ContributionTooShort { min: usize, actual: usize },
}

impl ValidationError {
    /// The form field that caused this error
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::EmptyTitle => FormField::Title,
            ValidationError::EmptyPrompt => FormField::Prompt,
            ValidationError::EmptyContribution | ValidationError::ContributionTooShort { .. } => {
                FormField::ContributionText
            }
        }
    }

    /// Short heading used when the error is shown as a notice
    pub fn heading(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle | ValidationError::EmptyPrompt => "Required field",
            ValidationError::EmptyContribution => "Empty contribution",
            ValidationError::ContributionTooShort { .. } => "Contribution too short",
        }
    }
}
