//! SQLite persistence adapter
//!
//! Implements ConsultationStore on top of a small sqlx connection pool.

pub mod sqlite;

pub use sqlite::SqliteConsultationStore;
