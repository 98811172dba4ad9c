//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — identifier of a generation model served by the local service
//! - [`error::ValidationError`] — form-level validation failures

pub mod error;
pub mod model;
