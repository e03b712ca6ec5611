//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::records::{JobRecord, ResumeRecord};
use crate::persistence::ApplicationRow;
use crate::pipeline::state::{RunState, ScreeningInput, Stage};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<String>,
}

/// The terminal fields of a run, plus whatever partial results exist.
#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    /// Headline error, prefixed with the failing stage's label.
    pub error: Option<String>,
    pub failed_stage: Option<Stage>,
    pub candidate_name: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub persisted: bool,
    pub notified: bool,
    pub stages_run: Vec<Stage>,
    pub resume: Option<ResumeRecord>,
    pub job: Option<JobRecord>,
}

impl From<&RunState> for ScreeningResponse {
    fn from(state: &RunState) -> Self {
        let resume = state.resume_record().cloned();
        Self {
            error: state.error().map(ToString::to_string),
            failed_stage: state.error().map(|e| e.stage),
            candidate_name: resume.as_ref().and_then(|r| r.candidate_name.clone()),
            score: state.score(),
            feedback: state.feedback().map(String::from),
            persisted: state.persisted(),
            notified: state.notified(),
            stages_run: state.stages_run().to_vec(),
            resume,
            job: state.job_record().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub job_title: String,
    pub applications: Vec<ApplicationRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
///
/// Titles a candidate can apply for, in catalog order.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<JobsResponse>, AppError> {
    let catalog = state.catalog.load().await?;
    Ok(Json(JobsResponse {
        jobs: catalog.titles(),
    }))
}

/// POST /api/v1/screenings
///
/// Multipart body: a `resume` file part and a `job_title` text part.
/// Runs the full pipeline. Once the body is read the response is always 200;
/// stage failures are reported in the body, not the status.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut input = ScreeningInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                input.filename = field.file_name().map(String::from);
                input.resume_bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Could not read resume upload: {e}"))
                })?);
            }
            "job_title" => {
                input.job_title = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Could not read job_title: {e}"))
                })?);
            }
            other => info!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    let run = state.pipeline.run(input).await;
    Ok(Json(ScreeningResponse::from(&run)))
}

/// GET /api/v1/jobs/:title/applications
///
/// Stored screenings for a catalog title, highest score first.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(job_title): Path<String>,
) -> Result<Json<ApplicationsResponse>, AppError> {
    if job_title.trim().is_empty() {
        return Err(AppError::Validation("job title cannot be empty".to_string()));
    }
    let catalog = state.catalog.load().await?;
    if catalog.find(&job_title).is_none() {
        return Err(AppError::NotFound(format!(
            "Job title '{}' not found in the job catalog",
            job_title.trim()
        )));
    }

    let applications = state.store.list_for_job(&job_title).await?;
    Ok(Json(ApplicationsResponse {
        job_title,
        applications,
    }))
}
