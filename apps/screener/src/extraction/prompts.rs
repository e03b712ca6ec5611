// LLM prompt templates for resume and job description extraction.

/// Resume extraction prompt. Replace `{json_only}` and `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following resume text and extract the information into a JSON object with this schema:
{
  "candidate_name": "string or null",
  "email": "string or null",
  "phone": "string or null",
  "summary": "string or null",
  "skills": ["string"],
  "experience": [
    {"job_title": "string or null", "company": "string or null", "duration": "string or null", "description": "string or null"}
  ],
  "education": [
    {"degree": "string or null", "institution": "string or null", "years": "string or null"}
  ],
  "misc": {}
}

Use null for anything the resume does not state. Do NOT invent details.
{json_only}

Resume Text:
---
{resume_text}
---"#;

/// Job description extraction prompt. Replace `{json_only}`, `{job_title}` and `{jd_text}`.
pub const JD_PARSE_PROMPT_TEMPLATE: &str = r#"Analyze the following job description for '{job_title}' and extract the key information into a JSON object with this schema:
{
  "job_title": "string",
  "company": "string or null",
  "location": "string or null",
  "summary": "string or null",
  "responsibilities": ["string"],
  "required_skills": ["string"],
  "preferred_skills": ["string"],
  "required_experience": "string or null",
  "required_education": "string or null",
  "misc": {}
}

{json_only}

Job Description Text:
---
{jd_text}
---"#;
