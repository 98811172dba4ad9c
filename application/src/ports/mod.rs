//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod consultation_store;
pub mod generation_gateway;
pub mod synthesis_progress;
