//! Synthesis subdomain.
//!
//! - [`prompt::SynthesisPromptTemplate`] — instruction template sent to the model
//! - [`options::GenerationOptions`] — decoding parameters for a generation request
//! - [`stream::StreamEvent`] — one event of a streamed generation
//! - [`status::SynthesisStatus`] — lifecycle status shown by synthesis views

pub mod options;
pub mod prompt;
pub mod status;
pub mod stream;
