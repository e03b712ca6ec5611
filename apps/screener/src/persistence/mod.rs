//! Persistence collaborator: one append-only row per completed match.
//!
//! Rows are never updated. The table is created lazily on first use and the
//! CREATE statement is idempotent, so several stores may share one database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tokio::sync::OnceCell;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::records::{JobRecord, ResumeRecord};
use crate::scoring::MatchOutcome;

const CREATE_APPLICATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS applications (
        id BLOB PRIMARY KEY,
        candidate_name TEXT,
        candidate_email TEXT,
        applied_job_title TEXT NOT NULL,
        match_score REAL NOT NULL,
        feedback TEXT NOT NULL,
        resume_data TEXT NOT NULL,
        jd_data TEXT NOT NULL,
        application_timestamp TEXT NOT NULL
    )
"#;

/// Everything a completed match writes to storage.
#[derive(Debug, Clone, Copy)]
pub struct ApplicationRecord<'a> {
    pub resume: &'a ResumeRecord,
    pub job: &'a JobRecord,
    pub outcome: &'a MatchOutcome,
}

/// A stored application, without the JSON snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub applied_job_title: String,
    pub match_score: f64,
    pub feedback: String,
    pub application_timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, record: &ApplicationRecord<'_>) -> Result<(), AppError>;
}

pub struct SqliteResultStore {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

impl SqliteResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    /// Creates the applications table if absent. Runs at most once per store.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_APPLICATIONS_TABLE)
                    .execute(&self.pool)
                    .await?;
                info!("Applications table ready");
                Ok::<(), AppError>(())
            })
            .await?;
        Ok(())
    }

    /// Past applications for a title (trimmed, case-insensitive), best score first.
    pub async fn list_for_job(&self, job_title: &str) -> Result<Vec<ApplicationRow>, AppError> {
        self.ensure_schema().await?;
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, candidate_name, candidate_email, applied_job_title,
                   match_score, feedback, application_timestamp
            FROM applications
            WHERE lower(trim(applied_job_title)) = lower(trim(?1))
            ORDER BY match_score DESC, application_timestamp ASC
            "#,
        )
        .bind(job_title)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn save(&self, record: &ApplicationRecord<'_>) -> Result<(), AppError> {
        self.ensure_schema().await?;

        let resume_json = serde_json::to_string(record.resume)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
        let jd_json = serde_json::to_string(record.job)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize JD: {e}")))?;

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO applications
                (id, candidate_name, candidate_email, applied_job_title,
                 match_score, feedback, resume_data, jd_data, application_timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(id)
        .bind(record.resume.candidate_name.as_deref())
        .bind(record.resume.email.as_deref())
        .bind(&record.job.job_title)
        .bind(record.outcome.score)
        .bind(&record.outcome.feedback)
        .bind(resume_json)
        .bind(jd_json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(
            "Saved match result {id} for {} applying for {}",
            record.resume.candidate_name.as_deref().unwrap_or("unknown candidate"),
            record.job.job_title
        );
        Ok(())
    }
}
