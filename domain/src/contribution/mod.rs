//! Contribution subdomain.
//!
//! - [`entities::Contribution`] — a persisted contribution
//! - [`entities::NewContribution`] — validated text bound to a consultation

pub mod entities;
