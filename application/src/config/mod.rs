//! Application-level configuration.
//!
//! - [`SynthesisParams`] — model fallback, decoding options and output language
//!   used by [`RunSynthesisUseCase`](crate::use_cases::run_synthesis::RunSynthesisUseCase)

pub mod synthesis_params;

pub use synthesis_params::SynthesisParams;
