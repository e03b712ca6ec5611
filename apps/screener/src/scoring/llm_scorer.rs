use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::records::{JobRecord, ResumeRecord};
use crate::scoring::prompts::MATCH_PROMPT_TEMPLATE;
use crate::scoring::{MatchOutcome, Scorer};

/// Some spread in feedback wording, not in the score.
const MATCH_TEMPERATURE: f32 = 0.5;
const FALLBACK_FEEDBACK: &str = "Feedback could not be generated.";

#[derive(Debug, Deserialize)]
struct MatchResponse {
    #[serde(deserialize_with = "number_or_numeric_string")]
    match_score: f64,
    #[serde(default)]
    feedback: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Models sometimes quote the score (`"85"`); accept that, reject other text.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("match_score is not a number: '{s}'"))),
    }
}

/// Semantic scorer: the model reads both records and returns score + feedback.
pub struct LlmScorer(pub LlmClient);

#[async_trait]
impl Scorer for LlmScorer {
    async fn score(
        &self,
        resume: &ResumeRecord,
        job: &JobRecord,
    ) -> Result<MatchOutcome, AppError> {
        let resume_json = serde_json::to_string_pretty(resume)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
        let jd_json = serde_json::to_string_pretty(job)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize JD: {e}")))?;

        let prompt = MATCH_PROMPT_TEMPLATE
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
            .replace("{jd_json}", &jd_json)
            .replace("{resume_json}", &resume_json);

        let response: MatchResponse = self
            .0
            .call_json(&prompt, MATCH_TEMPERATURE)
            .await
            .map_err(AppError::from)?;

        let outcome = into_outcome(response);
        info!(
            "LLM matching complete for {} / {}: {}",
            resume.candidate_name.as_deref().unwrap_or("unknown candidate"),
            job.job_title,
            outcome.score
        );
        Ok(outcome)
    }
}

fn into_outcome(response: MatchResponse) -> MatchOutcome {
    let feedback = response
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| FALLBACK_FEEDBACK.to_string());
    MatchOutcome {
        score: response.match_score,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_content;

    #[test]
    fn test_response_parses_from_fenced_json() {
        let response: MatchResponse = parse_json_content(
            "```json\n{\"match_score\": 72, \"feedback\": \"Strong SQL background.\"}\n```",
        )
        .unwrap();
        let outcome = into_outcome(response);
        assert_eq!(outcome.score, 72.0);
        assert_eq!(outcome.feedback, "Strong SQL background.");
    }

    #[test]
    fn test_missing_feedback_falls_back() {
        let response: MatchResponse = serde_json::from_str(r#"{"match_score": 40}"#).unwrap();
        assert_eq!(into_outcome(response).feedback, FALLBACK_FEEDBACK);

        let response: MatchResponse =
            serde_json::from_str(r#"{"match_score": 40, "feedback": "   "}"#).unwrap();
        assert_eq!(into_outcome(response).feedback, FALLBACK_FEEDBACK);
    }

    #[test]
    fn test_response_parses_after_leading_prose() {
        let text = "Here is the analysis:\n```json\n{\"match_score\": 72, \"feedback\": \"Solid SQL.\"}\n```";
        let response: MatchResponse = parse_json_content(text).unwrap();
        let outcome = into_outcome(response);
        assert_eq!(outcome.score, 72.0);
        assert_eq!(outcome.feedback, "Solid SQL.");
    }

    #[test]
    fn test_numeric_string_score_is_accepted() {
        let response: MatchResponse =
            parse_json_content(r#"{"match_score": "85", "feedback": "ok"}"#).unwrap();
        assert_eq!(into_outcome(response).score, 85.0);

        let response: MatchResponse =
            parse_json_content(r#"{"match_score": " 72.5 ", "feedback": "ok"}"#).unwrap();
        assert_eq!(into_outcome(response).score, 72.5);
    }

    #[test]
    fn test_non_numeric_string_score_is_rejected() {
        let result: Result<MatchResponse, _> =
            parse_json_content(r#"{"match_score": "high", "feedback": "ok"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_score_is_a_parse_error() {
        let result: Result<MatchResponse, _> =
            serde_json::from_str(r#"{"feedback": "Looks good"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_score_is_passed_through_for_the_pipeline_to_clamp() {
        let response: MatchResponse =
            serde_json::from_str(r#"{"match_score": 140, "feedback": "x"}"#).unwrap();
        assert_eq!(into_outcome(response).score, 140.0);
    }
}
