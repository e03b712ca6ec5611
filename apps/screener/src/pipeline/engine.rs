use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::CatalogSource;
use crate::extraction::Extractor;
use crate::notification::{Notification, Notifier};
use crate::persistence::{ApplicationRecord, ResultStore};
use crate::pipeline::state::{RunState, ScreeningInput, Stage};
use crate::scoring::{clamp_score, MatchOutcome, Scorer};

/// What the sequencer does after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Halt,
}

type StageResult = Result<(), String>;

/// Runs one screening end to end. Holds only shared collaborator handles, so
/// a single `Pipeline` serves concurrent runs; each run owns its `RunState`.
pub struct Pipeline {
    catalog: Arc<dyn CatalogSource>,
    extractor: Arc<dyn Extractor>,
    scorer: Arc<dyn Scorer>,
    store: Arc<dyn ResultStore>,
    notifier: Arc<dyn Notifier>,
}

impl Pipeline {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        extractor: Arc<dyn Extractor>,
        scorer: Arc<dyn Scorer>,
        store: Arc<dyn ResultStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            catalog,
            extractor,
            scorer,
            store,
            notifier,
        }
    }

    pub async fn run(&self, input: ScreeningInput) -> RunState {
        let mut state = RunState::new(input);
        info!(
            "Starting screening of {} for {}",
            state.input.filename.as_deref().unwrap_or("<no file>"),
            state.input.job_title.as_deref().unwrap_or("<no title>")
        );

        for stage in Stage::GATED {
            if self.run_stage(stage, &mut state).await == Flow::Halt {
                warn!("Screening halted after {stage}");
                return state;
            }
        }

        // Persist never halts the run: Notify goes ahead even when Persist
        // failed or skipped itself, so its Flow is deliberately ignored.
        self.run_stage(Stage::Persist, &mut state).await;
        self.run_stage(Stage::Notify, &mut state).await;

        info!(
            "Screening finished: score={:?} persisted={} notified={}",
            state.score(),
            state.persisted,
            state.notified
        );
        state
    }

    async fn run_stage(&self, stage: Stage, state: &mut RunState) -> Flow {
        info!("Stage: {stage}");
        state.stages_run.push(stage);

        let result = match stage {
            Stage::LoadAndValidate => self.load_and_validate(state).await,
            Stage::ExtractResume => self.extract_resume(state).await,
            Stage::ExtractJob => self.extract_job(state).await,
            Stage::Score => self.score(state).await,
            Stage::Persist => self.persist(state).await,
            Stage::Notify => self.notify(state).await,
        };
        if let Err(message) = result {
            state.record_error(stage, message);
        }

        if state.error.is_some() {
            Flow::Halt
        } else {
            Flow::Continue
        }
    }

    async fn load_and_validate(&self, state: &mut RunState) -> StageResult {
        let catalog = self.catalog.load().await.map_err(|e| e.to_string())?;
        if catalog.is_empty() {
            return Err("Job catalog is empty.".to_string());
        }
        state.job_catalog = Some(catalog);

        let input = &state.input;
        let has_bytes = input.resume_bytes.as_ref().is_some_and(|b| !b.is_empty());
        let has_name = input.filename.as_deref().is_some_and(|f| !f.trim().is_empty());
        if !has_bytes || !has_name {
            return Err("Resume file not provided.".to_string());
        }
        if input.job_title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err("Job title not selected.".to_string());
        }

        info!("Initial input validation successful");
        Ok(())
    }

    async fn extract_resume(&self, state: &mut RunState) -> StageResult {
        let (Some(bytes), Some(filename)) = (&state.input.resume_bytes, &state.input.filename)
        else {
            return Err("Resume file not provided.".to_string());
        };

        let resume = self
            .extractor
            .extract_resume(bytes.clone(), filename)
            .await
            .map_err(|e| e.detail())?;

        info!(
            "Resume parsed for candidate: {}",
            resume.candidate_name.as_deref().unwrap_or("unknown")
        );
        state.resume_record = Some(resume);
        Ok(())
    }

    async fn extract_job(&self, state: &mut RunState) -> StageResult {
        let title = state.input.job_title.as_deref().unwrap_or_default().trim();
        let Some(catalog) = &state.job_catalog else {
            return Err("Job catalog was not loaded.".to_string());
        };
        let Some(posting) = catalog.find(title) else {
            return Err(format!("Job title '{title}' not found in the job catalog."));
        };
        if posting.description.trim().is_empty() {
            return Err(format!("Job description text is empty for '{title}'."));
        }

        let job = self
            .extractor
            .extract_job(title, posting)
            .await
            .map_err(|e| e.detail())?
            .with_catalog_overlay(title, posting)
            .validate()?;

        info!("Job description parsed for: {}", job.job_title);
        state.job_record = Some(job);
        Ok(())
    }

    async fn score(&self, state: &mut RunState) -> StageResult {
        let (Some(resume), Some(job)) = (&state.resume_record, &state.job_record) else {
            return Err("Cannot perform matching due to missing parsed resume or JD.".to_string());
        };

        let outcome = self
            .scorer
            .score(resume, job)
            .await
            .map_err(|e| e.detail())?;
        let Some(score) = clamp_score(outcome.score) else {
            return Err(format!("Scorer returned a non-numeric score ({}).", outcome.score));
        };
        if score != outcome.score {
            warn!("Score {} out of range, clamped to {score}", outcome.score);
        }

        info!("Matching complete. Score: {score}");
        state.outcome = Some(MatchOutcome {
            score,
            feedback: outcome.feedback,
        });
        Ok(())
    }

    async fn persist(&self, state: &mut RunState) -> StageResult {
        state.persisted = false;
        let ready = state.error.is_none() && state.outcome.is_some();
        let (true, Some(resume), Some(job), Some(outcome)) =
            (ready, &state.resume_record, &state.job_record, &state.outcome)
        else {
            warn!("Skipping database save due to previous error or missing match score");
            return Ok(());
        };

        let record = ApplicationRecord {
            resume,
            job,
            outcome,
        };
        self.store
            .save(&record)
            .await
            .map_err(|e| e.detail())?;

        info!("Results saved to database");
        state.persisted = true;
        Ok(())
    }

    async fn notify(&self, state: &mut RunState) -> StageResult {
        state.notified = false;
        let notification = match (&state.outcome, &state.resume_record, &state.job_record) {
            (Some(outcome), Some(resume), job) if !outcome.feedback.trim().is_empty() => {
                Notification {
                    address: resume.contact_address().map(String::from),
                    candidate_name: resume.candidate_name.clone(),
                    job_title: job
                        .as_ref()
                        .map(|j| j.job_title.clone())
                        .unwrap_or_else(|| state.input.job_title.clone().unwrap_or_default()),
                    score: outcome.score,
                    feedback: outcome.feedback.clone(),
                }
            }
            _ => {
                warn!("Skipping email due to missing score, resume info, or feedback");
                return Err("Email not sent due to missing information.".to_string());
            }
        };
        if notification.address.is_none() {
            warn!("Parsed resume has no email address");
            return Err("Email not sent: no email address found in the resume.".to_string());
        }

        state.notified = self.notifier.notify(&notification).await;
        if !state.notified {
            warn!("Candidate email could not be delivered");
        }
        Ok(())
    }
}
