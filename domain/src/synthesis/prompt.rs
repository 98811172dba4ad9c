//! Prompt template for consultation syntheses

use crate::consultation::entities::Consultation;
use crate::contribution::entities::Contribution;

/// Separator placed between two contributions in the prompt
pub const CONTRIBUTION_DELIMITER: &str = "\n\n---\n\n";

/// Concatenate contributions into one labeled block.
///
/// Each contribution is labeled with its 1-based position in the given order.
pub fn contributions_block(contributions: &[Contribution]) -> String {
    contributions
        .iter()
        .enumerate()
        .map(|(i, c)| format!("Contribution {}:\n{}", i + 1, c.text))
        .collect::<Vec<_>>()
        .join(CONTRIBUTION_DELIMITER)
}

/// Template for the synthesis instruction sent to the model
#[derive(Debug, Clone)]
pub struct SynthesisPromptTemplate {
    language: String,
}

impl SynthesisPromptTemplate {
    /// Create a template producing answers in the given language
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Build the full prompt for a consultation and its contributions
    pub fn render(&self, consultation: &Consultation, contributions: &[Contribution]) -> String {
        format!(
            r#"You are an expert in analysing and synthesising citizen contributions.

CONTEXT:
A public consultation titled "{title}" was held on the following question: "{question}"

PARTICIPANT CONTRIBUTIONS:
{block}

MISSION:
Analyse these contributions and produce a structured synthesis that:
1. Identifies the MAIN THEMES emerging from the contributions
2. Presents the POINTS OF CONSENSUS (ideas shared by several participants)
3. Highlights the DIVERGENCES or opposing points of view
4. Proposes RECOMMENDATIONS based on all the opinions expressed

RESPONSE FORMAT:
Use clear headings and bullet points to structure your answer.
Be objective and faithfully represent every opinion expressed.
Write in {language}. Be concise.
"#,
            title = consultation.title,
            question = consultation.prompt,
            block = contributions_block(contributions),
            language = self.language,
        )
    }
}

impl Default for SynthesisPromptTemplate {
    fn default() -> Self {
        Self::new("French")
    }
}
