//! Resume Parser: file bytes → text → structured `ResumeRecord`.

use bytes::Bytes;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::documents::extract_text;
use crate::extraction::prompts::RESUME_PARSE_PROMPT_TEMPLATE;
use crate::extraction::EXTRACTION_TEMPERATURE;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::records::ResumeRecord;

/// Extracts the upload's text and asks the LLM to structure it.
pub async fn parse_resume(
    bytes: Bytes,
    filename: &str,
    llm: &LlmClient,
) -> Result<ResumeRecord, AppError> {
    let name = filename.to_string();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &name))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))??;

    info!(
        "Extracted text from {filename}. Length: {}. Calling LLM...",
        text.len()
    );

    let prompt = RESUME_PARSE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", &text);
    let value: Value = llm
        .call_json(&prompt, EXTRACTION_TEMPERATURE)
        .await
        .map_err(AppError::from)?;

    let resume = resume_from_value(value)?;
    if resume.is_sparse() {
        warn!("Resume parsing resulted in mostly empty fields for {filename}");
    }
    Ok(resume)
}

/// Validates raw model output against the resume schema.
pub fn resume_from_value(value: Value) -> Result<ResumeRecord, AppError> {
    if !matches!(&value, Value::Object(map) if !map.is_empty()) {
        return Err(AppError::Llm(
            "LLM failed to parse resume, returned empty data.".to_string(),
        ));
    }

    let resume: ResumeRecord = serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Resume does not match schema: {e}")))?;
    if resume.is_empty() {
        return Err(AppError::Llm(
            "LLM failed to parse resume, returned empty data.".to_string(),
        ));
    }

    resume
        .validate()
        .map_err(|e| AppError::Validation(format!("Resume does not match schema: {e}")))
}
