//! SQLite consultation store

use agora_application::ports::consultation_store::{ConsultationStore, StoreError};
use agora_domain::{
    Consultation, ConsultationId, ConsultationSummary, Contribution, ContributionId,
    NewConsultation, NewContribution,
};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const MAX_CONNECTIONS: u32 = 4;

const CREATE_CONSULTATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS consultations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nom TEXT NOT NULL,
        description TEXT NOT NULL
    )
"#;

const CREATE_CONTRIBUTIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS contributions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        consultation_id INTEGER NOT NULL REFERENCES consultations(id),
        texte TEXT NOT NULL
    )
"#;

fn backend(error: sqlx::Error) -> StoreError {
    StoreError::Backend(error.to_string())
}

/// ConsultationStore backed by a SQLite database file
///
/// Every operation acquires a pooled connection for its own duration only.
/// Foreign keys are enforced, so a contribution can only reference an
/// existing consultation.
#[derive(Clone)]
pub struct SqliteConsultationStore {
    pool: SqlitePool,
}

impl SqliteConsultationStore {
    /// Open (or create) the database at `path` and initialize the schema
    pub async fn connect(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Backend(format!("{}: {}", parent.display(), e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(backend)?;

        info!("Opened consultation database at {}", path.display());
        Self::from_pool(pool).await
    }

    /// Private in-memory database; lives as long as the store
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(backend)?
            .foreign_keys(true);
        // A single connection that is never recycled, since each in-memory
        // connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(backend)?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the tables if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        for statement in [CREATE_CONSULTATIONS, CREATE_CONTRIBUTIONS] {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(backend)?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ConsultationStore for SqliteConsultationStore {
    async fn create_consultation(
        &self,
        consultation: &NewConsultation,
    ) -> Result<Consultation, StoreError> {
        let id = sqlx::query("INSERT INTO consultations (nom, description) VALUES (?, ?)")
            .bind(consultation.title())
            .bind(consultation.prompt())
            .execute(&self.pool)
            .await
            .map_err(backend)?
            .last_insert_rowid();

        debug!("Inserted consultation {}", id);
        Ok(Consultation {
            id: ConsultationId(id),
            title: consultation.title().to_string(),
            prompt: consultation.prompt().to_string(),
        })
    }

    async fn list_consultations(&self) -> Result<Vec<ConsultationSummary>, StoreError> {
        let rows: Vec<(i64, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT c.id, c.nom, c.description, COUNT(k.id)
            FROM consultations c
            LEFT JOIN contributions k ON k.consultation_id = c.id
            GROUP BY c.id
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|(id, title, prompt, count)| ConsultationSummary {
                id: ConsultationId(id),
                title,
                prompt,
                contribution_count: count.max(0) as u64,
            })
            .collect())
    }

    async fn get_consultation(
        &self,
        id: ConsultationId,
    ) -> Result<Option<Consultation>, StoreError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT nom, description FROM consultations WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        Ok(row.map(|(title, prompt)| Consultation { id, title, prompt }))
    }

    async fn create_contribution(
        &self,
        contribution: &NewContribution,
    ) -> Result<Contribution, StoreError> {
        let consultation_id = contribution.consultation_id();
        let result = sqlx::query("INSERT INTO contributions (consultation_id, texte) VALUES (?, ?)")
            .bind(consultation_id.0)
            .bind(contribution.text())
            .execute(&self.pool)
            .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                return Err(StoreError::UnknownConsultation(consultation_id));
            }
            Err(e) => return Err(backend(e)),
        };

        debug!("Inserted contribution {} for consultation {}", id, consultation_id);
        Ok(Contribution {
            id: ContributionId(id),
            consultation_id,
            text: contribution.text().to_string(),
        })
    }

    async fn list_contributions(
        &self,
        id: ConsultationId,
    ) -> Result<Vec<Contribution>, StoreError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, texte FROM contributions WHERE consultation_id = ? ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|(row_id, text)| Contribution {
                id: ContributionId(row_id),
                consultation_id: id,
                text,
            })
            .collect())
    }

    async fn count_contributions(&self, id: ConsultationId) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM contributions WHERE consultation_id = ?")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;
        Ok(count.max(0) as u64)
    }
}
