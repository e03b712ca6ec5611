//! Fake collaborators for pipeline and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::catalog::{JobCatalog, JobPosting};
use crate::errors::AppError;
use crate::extraction::Extractor;
use crate::models::records::{JobRecord, ResumeRecord};
use crate::notification::{Notification, Notifier};
use crate::persistence::{ApplicationRecord, ResultStore};
use crate::pipeline::{Pipeline, ScreeningInput};
use crate::scoring::{MatchOutcome, Scorer};

pub fn catalog() -> Arc<JobCatalog> {
    Arc::new(JobCatalog::new(vec![
        JobPosting {
            title: "Data Scientist".to_string(),
            description: "Build models in Python and SQL.".to_string(),
            company: Some("Acme".to_string()),
            location: Some("Pune".to_string()),
        },
        JobPosting {
            title: "Office Manager".to_string(),
            description: "   ".to_string(),
            company: None,
            location: None,
        },
    ]))
}

pub fn resume() -> ResumeRecord {
    ResumeRecord {
        candidate_name: Some("Asha Rao".to_string()),
        email: Some("asha@example.com".to_string()),
        skills: vec!["Python".to_string(), "SQL".to_string()],
        ..Default::default()
    }
}

pub fn input(title: &str) -> ScreeningInput {
    ScreeningInput {
        resume_bytes: Some(Bytes::from_static(b"Asha Rao\nPython, SQL")),
        filename: Some("asha.txt".to_string()),
        job_title: Some(title.to_string()),
    }
}

pub struct FakeExtractor {
    pub resume: Result<ResumeRecord, String>,
    /// Model output for job extraction. Its title differs from the catalog's on purpose.
    pub job: JobRecord,
    pub resume_calls: AtomicUsize,
    pub job_calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn ok() -> Self {
        Self::with_resume(Ok(resume()))
    }

    pub fn with_resume(resume: Result<ResumeRecord, String>) -> Self {
        Self {
            resume,
            job: JobRecord {
                job_title: "data scientist (parsed)".to_string(),
                required_skills: vec!["Python".to_string(), "SQL".to_string()],
                ..Default::default()
            },
            resume_calls: AtomicUsize::new(0),
            job_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn extract_resume(
        &self,
        _bytes: Bytes,
        _filename: &str,
    ) -> Result<ResumeRecord, AppError> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        self.resume.clone().map_err(AppError::Llm)
    }

    async fn extract_job(
        &self,
        _title: &str,
        _posting: &JobPosting,
    ) -> Result<JobRecord, AppError> {
        self.job_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.job.clone())
    }
}

pub struct FakeScorer(pub Result<f64, String>);

#[async_trait]
impl Scorer for FakeScorer {
    async fn score(
        &self,
        _resume: &ResumeRecord,
        _job: &JobRecord,
    ) -> Result<MatchOutcome, AppError> {
        let score = self.0.clone().map_err(AppError::Llm)?;
        Ok(MatchOutcome {
            score,
            feedback: format!("Scored {score}"),
        })
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub fail: bool,
    pub saved: Mutex<Vec<(String, f64)>>,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<(String, f64)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultStore for FakeStore {
    async fn save(&self, record: &ApplicationRecord<'_>) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Internal(anyhow::anyhow!("disk full")));
        }
        self.saved
            .lock()
            .unwrap()
            .push((record.job.job_title.clone(), record.outcome.score));
        Ok(())
    }
}

pub struct FakeNotifier {
    pub succeed: bool,
    pub sent: Mutex<Vec<Notification>>,
}

impl FakeNotifier {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, notification: &Notification) -> bool {
        self.sent.lock().unwrap().push(notification.clone());
        self.succeed
    }
}

/// Handles kept by a test after the pipeline takes its `Arc`s.
pub struct Harness {
    pub pipeline: Pipeline,
    pub extractor: Arc<FakeExtractor>,
    pub store: Arc<FakeStore>,
    pub notifier: Arc<FakeNotifier>,
}

pub fn harness(extractor: FakeExtractor, score: Result<f64, String>, store: FakeStore) -> Harness {
    let extractor = Arc::new(extractor);
    let store = Arc::new(store);
    let notifier = Arc::new(FakeNotifier::new(true));
    let pipeline = Pipeline::new(
        Arc::new(catalog()),
        extractor.clone(),
        Arc::new(FakeScorer(score)),
        store.clone(),
        notifier.clone(),
    );
    Harness {
        pipeline,
        extractor,
        store,
        notifier,
    }
}
