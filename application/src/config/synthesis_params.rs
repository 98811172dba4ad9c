//! Synthesis parameters — use case configuration.
//!
//! [`SynthesisParams`] groups the static parameters that control a synthesis
//! run. These are application-layer concerns, populated from the
//! infrastructure config at startup.

use agora_domain::{GenerationOptions, Model, SynthesisPromptTemplate};

/// Parameters for synthesis generation.
#[derive(Debug, Clone)]
pub struct SynthesisParams {
    /// Model used when discovery fails or returns nothing.
    pub default_model: Model,
    /// Decoding parameters sent with the generation request.
    pub options: GenerationOptions,
    /// Instruction template (carries the target language).
    pub template: SynthesisPromptTemplate,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            default_model: Model::default(),
            options: GenerationOptions::default(),
            template: SynthesisPromptTemplate::default(),
        }
    }
}

impl SynthesisParams {
    // ==================== Builder Methods ====================

    pub fn with_default_model(mut self, model: Model) -> Self {
        self.default_model = model;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.template = SynthesisPromptTemplate::new(language);
        self
    }
}
