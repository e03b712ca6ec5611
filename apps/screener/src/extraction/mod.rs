//! Extraction collaborator: turns an uploaded resume and a catalog posting
//! into structured records via the language model.

use async_trait::async_trait;
use bytes::Bytes;

use crate::catalog::JobPosting;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::records::{JobRecord, ResumeRecord};

pub mod documents;
pub mod jd_parser;
pub mod prompts;
pub mod resume_parser;

/// Low temperature keeps extraction close to deterministic.
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Carried by the pipeline as `Arc<dyn Extractor>`; tests swap in fakes.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract_resume(&self, bytes: Bytes, filename: &str)
        -> Result<ResumeRecord, AppError>;

    async fn extract_job(&self, title: &str, posting: &JobPosting)
        -> Result<JobRecord, AppError>;
}

/// Production extractor backed by the shared `LlmClient`.
pub struct LlmExtractor(pub LlmClient);

#[async_trait]
impl Extractor for LlmExtractor {
    async fn extract_resume(
        &self,
        bytes: Bytes,
        filename: &str,
    ) -> Result<ResumeRecord, AppError> {
        resume_parser::parse_resume(bytes, filename, &self.0).await
    }

    async fn extract_job(
        &self,
        title: &str,
        posting: &JobPosting,
    ) -> Result<JobRecord, AppError> {
        jd_parser::parse_jd(title, posting, &self.0).await
    }
}
