//! Keyword fit scoring: deterministic scorer that needs no model call.
//!
//! Algorithm:
//! 1. Each JD skill carries a weight: required = 1.0, preferred = 0.5.
//! 2. For each skill:
//!    - exact match against a resume skill → strength 1.0
//!    - whole-word match in the resume's free text (summary, experience)
//!      or inside a longer resume skill → strength 0.6
//!    - otherwise → strength 0.0
//! 3. score = Σ(strength × weight) / Σ(weight) × 100
//! 4. Classify: strong (≥0.8), partial (0.4–0.79), gap (<0.4)

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::records::{JobRecord, ResumeRecord};
use crate::scoring::{MatchOutcome, Scorer};

const REQUIRED_WEIGHT: f64 = 1.0;
const PREFERRED_WEIGHT: f64 = 0.5;
const SKILL_MATCH: f64 = 1.0;
const TEXT_MATCH: f64 = 0.6;

/// A JD skill and how well the resume covers it.
#[derive(Debug, Clone)]
struct SkillFit {
    skill: String,
    required: bool,
    strength: f64,
}

#[derive(Debug, Clone)]
struct KeywordFit {
    score: f64,
    strong: Vec<SkillFit>,
    partial: Vec<SkillFit>,
    gaps: Vec<SkillFit>,
}

pub struct KeywordScorer;

#[async_trait]
impl Scorer for KeywordScorer {
    async fn score(
        &self,
        resume: &ResumeRecord,
        job: &JobRecord,
    ) -> Result<MatchOutcome, AppError> {
        let fit = compute_keyword_fit(resume, job);
        Ok(MatchOutcome {
            score: fit.score,
            feedback: build_feedback(&fit, job),
        })
    }
}

fn compute_keyword_fit(resume: &ResumeRecord, job: &JobRecord) -> KeywordFit {
    let resume_skills: Vec<String> = resume
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();
    let resume_text = resume_free_text(resume);

    let wanted = job
        .required_skills
        .iter()
        .map(|s| (s, true))
        .chain(job.preferred_skills.iter().map(|s| (s, false)))
        .filter(|(s, _)| !s.trim().is_empty());

    let mut total_weight = 0.0_f64;
    let mut total_score = 0.0_f64;
    let mut strong = Vec::new();
    let mut partial = Vec::new();
    let mut gaps = Vec::new();

    for (skill, required) in wanted {
        let needle = skill.trim().to_lowercase();
        let weight = if required {
            REQUIRED_WEIGHT
        } else {
            PREFERRED_WEIGHT
        };

        let strength = if resume_skills.iter().any(|s| *s == needle) {
            SKILL_MATCH
        } else if contains_word(&resume_text, &needle)
            || resume_skills.iter().any(|s| contains_word(s, &needle))
        {
            TEXT_MATCH
        } else {
            0.0
        };

        total_weight += weight;
        total_score += strength * weight;

        let fit = SkillFit {
            skill: skill.trim().to_string(),
            required,
            strength,
        };
        if strength >= 0.8 {
            strong.push(fit);
        } else if strength >= 0.4 {
            partial.push(fit);
        } else {
            gaps.push(fit);
        }
    }

    let score = if total_weight > 0.0 {
        ((total_score / total_weight) * 100.0).round()
    } else {
        0.0
    };

    KeywordFit {
        score,
        strong,
        partial,
        gaps,
    }
}

/// True when `needle` occurs in `haystack` with no letter or digit on either side,
/// so "go" matches "go services" but not "google".
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Lowercased summary plus experience entries, for whole-word evidence.
fn resume_free_text(resume: &ResumeRecord) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(summary) = &resume.summary {
        parts.push(summary);
    }
    for exp in &resume.experience {
        parts.extend(exp.job_title.as_deref());
        parts.extend(exp.description.as_deref());
    }
    parts.join("\n").to_lowercase()
}

/// Builds candidate-facing feedback from the fit. Required gaps are listed first.
fn build_feedback(fit: &KeywordFit, job: &JobRecord) -> String {
    if fit.strong.is_empty() && fit.partial.is_empty() && fit.gaps.is_empty() {
        return format!(
            "The {} posting lists no specific skills, so we could not assess your fit automatically.",
            job.job_title
        );
    }

    let mut gaps: Vec<&SkillFit> = fit.gaps.iter().collect();
    gaps.sort_by_key(|g| !g.required);
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.skill.as_str()).collect();
    let strengths: Vec<&str> = fit
        .strong
        .iter()
        .chain(fit.partial.iter())
        .take(3)
        .map(|m| m.skill.as_str())
        .collect();

    let score = fit.score;
    if score >= 80.0 {
        format!(
            "Strong fit. Your resume directly covers the key requirements, including {}.",
            strengths.join(", ")
        )
    } else if score >= 60.0 {
        format!(
            "Moderate fit ({score:.0}/100). Strengths: {}. Consider highlighting experience with: {}.",
            or_none(&strengths),
            or_none(&top_gaps)
        )
    } else {
        format!(
            "Low fit ({score:.0}/100) for this role. Key missing requirements: {}. \
            Your background in {} may suit other openings.",
            or_none(&top_gaps),
            or_none(&strengths)
        )
    }
}

fn or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none identified".to_string()
    } else {
        items.join(", ")
    }
}
