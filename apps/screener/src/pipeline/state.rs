//! Run state: one screening attempt's data, owned by exactly one run.
//!
//! Stages write through the `pub(super)` fields; everything outside the
//! pipeline module reads through accessors. Records, outcome and error are
//! write-once.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::error;

use crate::catalog::JobCatalog;
use crate::models::records::{JobRecord, ResumeRecord};
use crate::scoring::MatchOutcome;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LoadAndValidate,
    ExtractResume,
    ExtractJob,
    Score,
    Persist,
    Notify,
}

impl Stage {
    /// Stages whose failure ends the run.
    pub const GATED: [Stage; 4] = [
        Stage::LoadAndValidate,
        Stage::ExtractResume,
        Stage::ExtractJob,
        Stage::Score,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LoadAndValidate => "load_and_validate",
            Stage::ExtractResume => "extract_resume",
            Stage::ExtractJob => "extract_job",
            Stage::Score => "score",
            Stage::Persist => "persist",
            Stage::Notify => "notify",
        }
    }

    /// Prefix shown to the user in front of a stage's error message.
    pub fn failure_label(&self) -> &'static str {
        match self {
            Stage::LoadAndValidate => "Initialization Error",
            Stage::ExtractResume => "Resume Parsing Failed",
            Stage::ExtractJob => "Job Description Parsing Failed",
            Stage::Score => "Matching Failed",
            Stage::Persist => "Database Save Failed",
            Stage::Notify => "Email Not Sent",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first failure recorded for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunError {
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage.failure_label(), self.message)
    }
}

/// Caller-supplied inputs. Every field is optional here because presence is
/// checked by the `LoadAndValidate` stage, not by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreeningInput {
    pub resume_bytes: Option<Bytes>,
    pub filename: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub(super) input: ScreeningInput,
    pub(super) job_catalog: Option<Arc<JobCatalog>>,
    pub(super) resume_record: Option<ResumeRecord>,
    pub(super) job_record: Option<JobRecord>,
    pub(super) outcome: Option<MatchOutcome>,
    pub(super) persisted: bool,
    pub(super) notified: bool,
    pub(super) error: Option<RunError>,
    pub(super) stages_run: Vec<Stage>,
}

impl RunState {
    pub fn new(input: ScreeningInput) -> Self {
        Self {
            input,
            job_catalog: None,
            resume_record: None,
            job_record: None,
            outcome: None,
            persisted: false,
            notified: false,
            error: None,
            stages_run: Vec::new(),
        }
    }

    pub fn resume_record(&self) -> Option<&ResumeRecord> {
        self.resume_record.as_ref()
    }

    pub fn job_record(&self) -> Option<&JobRecord> {
        self.job_record.as_ref()
    }

    pub fn score(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.score)
    }

    pub fn feedback(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.feedback.as_str())
    }

    pub fn persisted(&self) -> bool {
        self.persisted
    }

    pub fn notified(&self) -> bool {
        self.notified
    }

    pub fn error(&self) -> Option<&RunError> {
        self.error.as_ref()
    }

    pub fn stages_run(&self) -> &[Stage] {
        &self.stages_run
    }

    /// Records `message` unless an earlier error exists. Returns whether it was recorded.
    pub(super) fn record_error(&mut self, stage: Stage, message: impl Into<String>) -> bool {
        let message = message.into();
        if let Some(existing) = &self.error {
            error!("{stage} failed after earlier error ({existing}): {message}");
            return false;
        }
        let run_error = RunError { stage, message };
        error!("{run_error}");
        self.error = Some(run_error);
        true
    }
}
