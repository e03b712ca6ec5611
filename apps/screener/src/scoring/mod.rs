//! Scoring collaborator: compares a resume with a job description and
//! produces a 0–100 match score plus candidate-facing feedback.
//!
//! Backends: `LlmScorer` (default) and `KeywordScorer` (deterministic, offline).
//! The pipeline holds an `Arc<dyn Scorer>` chosen from `SCORER_BACKEND`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::records::{JobRecord, ResumeRecord};

pub mod fit_scoring;
pub mod llm_scorer;
pub mod prompts;

pub use fit_scoring::KeywordScorer;
pub use llm_scorer::LlmScorer;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Score and feedback always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub score: f64,
    pub feedback: String,
}

#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(
        &self,
        resume: &ResumeRecord,
        job: &JobRecord,
    ) -> Result<MatchOutcome, AppError>;
}

/// Clamps into [0, 100]. Non-finite scores have no meaningful clamp and are rejected.
pub fn clamp_score(score: f64) -> Option<f64> {
    score.is_finite().then(|| score.clamp(MIN_SCORE, MAX_SCORE))
}
