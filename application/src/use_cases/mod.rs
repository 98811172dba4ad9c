//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod create_consultation;
pub mod list_consultations;
pub mod run_synthesis;
pub mod submit_contribution;

#[cfg(test)]
pub(crate) mod test_support;
