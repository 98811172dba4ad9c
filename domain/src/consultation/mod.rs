//! Consultation subdomain.
//!
//! - [`entities::Consultation`] — a persisted consultation
//! - [`entities::NewConsultation`] — a validated consultation ready to be stored
//! - [`entities::ConsultationSummary`] — list read model with contribution count

pub mod entities;
