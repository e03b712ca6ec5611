//! JD Parser: turns a catalog posting into a structured `JobRecord`.
//!
//! The returned record is raw model output; the pipeline applies the catalog
//! overlay (title, company, location) before validating it.

use serde_json::Value;
use tracing::info;

use crate::catalog::JobPosting;
use crate::errors::AppError;
use crate::extraction::prompts::JD_PARSE_PROMPT_TEMPLATE;
use crate::extraction::EXTRACTION_TEMPERATURE;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::records::JobRecord;

/// Parses a job description using the LLM.
pub async fn parse_jd(
    title: &str,
    posting: &JobPosting,
    llm: &LlmClient,
) -> Result<JobRecord, AppError> {
    if posting.description.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Job description text is empty for '{title}'."
        )));
    }

    info!("Found job description for: {title}. Calling LLM...");

    let prompt = JD_PARSE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_title}", title)
        .replace("{jd_text}", &posting.description);
    let value: Value = llm
        .call_json(&prompt, EXTRACTION_TEMPERATURE)
        .await
        .map_err(AppError::from)?;

    job_from_value(value)
}

/// Validates raw model output against the job description schema.
pub fn job_from_value(value: Value) -> Result<JobRecord, AppError> {
    if !matches!(&value, Value::Object(map) if !map.is_empty()) {
        return Err(AppError::Llm(
            "LLM failed to parse job description, returned empty data.".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Job description does not match schema: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_output_deserializes() {
        let job = job_from_value(json!({
            "job_title": "Data Scientist",
            "company": null,
            "responsibilities": ["Build models"],
            "required_skills": ["Python", "SQL"],
            "preferred_skills": ["Spark"],
            "required_experience": "3+ years",
            "misc": {"salary": "competitive"}
        }))
        .unwrap();
        assert_eq!(job.required_skills, vec!["Python", "SQL"]);
        assert_eq!(job.misc["salary"], "competitive");
        assert!(job.company.is_none());
    }

    #[test]
    fn test_missing_title_still_deserializes_for_overlay() {
        let job = job_from_value(json!({"required_skills": ["Go"]})).unwrap();
        assert!(job.job_title.is_empty());
    }

    #[test]
    fn test_empty_object_is_llm_failure() {
        assert!(matches!(job_from_value(json!({})), Err(AppError::Llm(_))));
    }

    #[test]
    fn test_wrong_list_type_is_validation_error() {
        let err = job_from_value(json!({"required_skills": 5})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
