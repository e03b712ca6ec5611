use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
const DEFAULT_DATABASE_URL: &str = "sqlite://candidates_data.db?mode=rwc";

/// Which scoring backend the pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    Llm,
    Keyword,
}

/// Settings for the OpenAI-compatible chat completions provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Outbound mail settings. `sender`/`password` are optional: without them
/// the notifier reports every send as failed instead of erroring at startup.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub sender: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    /// Signs outgoing emails ("{company_name} Recruitment Team").
    pub company_name: String,
}

impl SmtpConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.sender.as_deref(), self.password.as_deref()) {
            (Some(s), Some(p)) if !s.is_empty() && !p.is_empty() => Some((s, p)),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub smtp: SmtpConfig,
    pub database_url: String,
    pub job_catalog_path: PathBuf,
    pub scorer_backend: ScorerBackend,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("LLM_API_KEY")
            .or_else(|| get("DEEPSEEK_API_KEY"))
            .context("Required environment variable 'LLM_API_KEY' is not set")?;

        let scorer_backend = match get("SCORER_BACKEND").as_deref() {
            None | Some("llm") => ScorerBackend::Llm,
            Some("keyword") => ScorerBackend::Keyword,
            Some(other) => bail!("SCORER_BACKEND must be 'llm' or 'keyword', got '{other}'"),
        };

        Ok(Config {
            llm: LlmConfig {
                api_key,
                base_url: get("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                timeout: parse_secs(get("LLM_TIMEOUT_SECS"), 90, "LLM_TIMEOUT_SECS")?,
            },
            smtp: SmtpConfig {
                server: get("SMTP_SERVER").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: get("SMTP_PORT")
                    .unwrap_or_else(|| "587".to_string())
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid port number")?,
                sender: get("EMAIL_SENDER"),
                password: get("EMAIL_PASSWORD"),
                timeout: parse_secs(get("SMTP_TIMEOUT_SECS"), 30, "SMTP_TIMEOUT_SECS")?,
                company_name: get("COMPANY_NAME").unwrap_or_else(|| "Our Company".to_string()),
            },
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            job_catalog_path: get("JOB_CATALOG_PATH")
                .map(PathBuf::from)
                .context("Required environment variable 'JOB_CATALOG_PATH' is not set")?,
            scorer_backend,
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_secs(value: Option<String>, default: u64, key: &str) -> Result<Duration> {
    let secs = match value {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds"))?,
        None => default,
    };
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "sk-test"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
        ]))
        .unwrap();

        assert_eq!(config.llm.base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.timeout, Duration::from_secs(90));
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.timeout, Duration::from_secs(30));
        assert!(config.smtp.credentials().is_none());
        assert_eq!(config.scorer_backend, ScorerBackend::Llm);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_deepseek_key_is_accepted_as_fallback() {
        let config = Config::from_lookup(lookup(&[
            ("DEEPSEEK_API_KEY", "sk-deepseek"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
        ]))
        .unwrap();
        assert_eq!(config.llm.api_key, "sk-deepseek");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup(&[("JOB_CATALOG_PATH", "jobs.csv")])).unwrap_err();
        assert!(err.to_string().contains("LLM_API_KEY"));
    }

    #[test]
    fn test_missing_catalog_path_fails() {
        let err = Config::from_lookup(lookup(&[("LLM_API_KEY", "k")])).unwrap_err();
        assert!(err.to_string().contains("JOB_CATALOG_PATH"));
    }

    #[test]
    fn test_smtp_credentials_require_both_values() {
        let config = Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "k"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
            ("EMAIL_SENDER", "hr@example.com"),
        ]))
        .unwrap();
        assert!(config.smtp.credentials().is_none());

        let config = Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "k"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
            ("EMAIL_SENDER", "hr@example.com"),
            ("EMAIL_PASSWORD", "app-password"),
        ]))
        .unwrap();
        assert_eq!(
            config.smtp.credentials(),
            Some(("hr@example.com", "app-password"))
        );
    }

    #[test]
    fn test_keyword_backend_and_bad_backend() {
        let config = Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "k"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
            ("SCORER_BACKEND", "keyword"),
        ]))
        .unwrap();
        assert_eq!(config.scorer_backend, ScorerBackend::Keyword);

        assert!(Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "k"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
            ("SCORER_BACKEND", "magic"),
        ]))
        .is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "k"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let config = Config::from_lookup(lookup(&[
            ("LLM_API_KEY", "k"),
            ("JOB_CATALOG_PATH", "jobs.csv"),
            ("LLM_BASE_URL", "http://localhost:11434/v1/"),
        ]))
        .unwrap();
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
    }
}
