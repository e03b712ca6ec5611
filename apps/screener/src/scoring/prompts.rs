// LLM prompt template for resume-to-job matching.

/// Matching prompt. Replace `{json_only}`, `{jd_json}` and `{resume_json}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert HR recruitment assistant. Compare the candidate resume JSON with the job description JSON.
Focus ONLY on the requirements in the job description (skills, experience, education) and assess how well the resume aligns with them. Ignore criteria present in the resume but not asked for in the job description.

Provide:
1. "match_score": an integer percentage between 0 and 100.
2. "feedback": constructive feedback for the candidate, 2-4 sentences.
   - Score >= 65: highlight matching strengths and mention minor gaps positively.
   - Score < 65: acknowledge general strengths, gently explain the key missing requirements for this role, and wish them luck.

{json_only}

Job Description JSON:
{jd_json}

Candidate Resume JSON:
{resume_json}"#;
