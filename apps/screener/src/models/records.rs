//! Structured records produced by the extraction collaborator.
//!
//! Optional fields mean "unknown", not "empty". Lists and the `misc` map
//! accept `null` from the model and fall back to empty.

use std::str::FromStr;

use lettre::Address;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::JobPosting;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub years: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub misc: Map<String, Value>,
}

impl ResumeRecord {
    /// True when the model produced nothing usable at all.
    pub fn is_empty(&self) -> bool {
        self.candidate_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.summary.is_none()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.misc.is_empty()
    }

    /// Name, email and skills all missing: accepted, but worth a log line.
    pub fn is_sparse(&self) -> bool {
        self.candidate_name.is_none() && self.email.is_none() && self.skills.is_empty()
    }

    /// Schema checks serde cannot express. Blank strings collapse to `None`.
    pub fn validate(mut self) -> Result<Self, String> {
        self.candidate_name = non_blank(self.candidate_name);
        self.email = non_blank(self.email).map(|e| e.trim().to_string());
        self.phone = non_blank(self.phone);
        self.summary = non_blank(self.summary);

        if let Some(email) = &self.email {
            Address::from_str(email).map_err(|e| format!("invalid email '{email}': {e}"))?;
        }
        Ok(self)
    }

    /// Address the notifier can write to, if any.
    pub fn contact_address(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Required. The catalog title always overrides whatever the model returned.
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub required_experience: Option<String>,
    #[serde(default)]
    pub required_education: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub misc: Map<String, Value>,
}

impl JobRecord {
    /// Merges catalog data into a model-extracted record. The catalog owns the
    /// title; company and location fill in only where the model left a gap.
    pub fn with_catalog_overlay(mut self, selected_title: &str, posting: &JobPosting) -> Self {
        self.job_title = selected_title.to_string();
        self.company = non_blank(self.company).or_else(|| posting.company.clone());
        self.location = non_blank(self.location).or_else(|| posting.location.clone());
        self
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.job_title.trim().is_empty() {
            return Err("job_title is required".to_string());
        }
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
