//! Job catalog: the set of postings a candidate can be screened against.
//!
//! Titles are matched case- and whitespace-insensitively. The CSV source is
//! re-read on every load so edits to the file are picked up without a restart.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Job descriptions file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read job descriptions file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed job descriptions CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV must contain 'Job Title' and 'Job Description' columns")]
    MissingColumns,

    #[error("Job catalog is empty")]
    Empty,
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Job Description", default)]
    pub description: String,
    #[serde(rename = "Company", default, deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCatalog {
    postings: Vec<JobPosting>,
}

impl JobCatalog {
    pub fn new(postings: Vec<JobPosting>) -> Self {
        Self { postings }
    }

    /// Parses CSV text with a `Job Title` / `Job Description` header.
    pub fn from_csv(text: &str) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let has = |name: &str| headers.iter().any(|h| h == name);
        if !has("Job Title") || !has("Job Description") {
            return Err(CatalogError::MissingColumns);
        }

        let postings = reader
            .deserialize::<JobPosting>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(postings))
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// First posting whose title matches after trimming and lowercasing.
    pub fn find(&self, title: &str) -> Option<&JobPosting> {
        let wanted = normalize_title(title);
        self.postings
            .iter()
            .find(|p| normalize_title(&p.title) == wanted)
    }

    /// Unique titles in file order.
    pub fn titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::new();
        for posting in &self.postings {
            let title = posting.title.trim();
            if !title.is_empty() && !titles.iter().any(|t| t == title) {
                titles.push(title.to_string());
            }
        }
        titles
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Where the pipeline gets its catalog from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Arc<JobCatalog>, CatalogError>;
}

/// Reads the catalog from a CSV file. Non-UTF-8 files are decoded as Latin-1.
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn load(&self) -> Result<Arc<JobCatalog>, CatalogError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(CatalogError::Io(e)),
        };

        let text = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
        };

        let catalog = JobCatalog::from_csv(&text)?;
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        info!(
            "Loaded {} job postings from {}",
            catalog.len(),
            self.path.display()
        );
        Ok(Arc::new(catalog))
    }
}

/// A catalog fixed at construction.
#[async_trait]
impl CatalogSource for Arc<JobCatalog> {
    async fn load(&self) -> Result<Arc<JobCatalog>, CatalogError> {
        if self.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Arc::clone(self))
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "Job Title,Job Description,Company,Location\n\
        Data Scientist,\"Build models, ship features.\",Acme,Pune\n\
        Backend Engineer,Own the APIs.,,\n\
        Data Scientist,Duplicate row,Other,Remote\n";

    #[test]
    fn test_find_is_case_and_whitespace_insensitive() {
        let catalog = JobCatalog::from_csv(CSV).unwrap();
        let posting = catalog.find("  data SCIENTIST ").unwrap();
        assert_eq!(posting.description, "Build models, ship features.");
        assert_eq!(posting.company.as_deref(), Some("Acme"));
        assert!(catalog.find("Product Manager").is_none());
    }

    #[test]
    fn test_blank_optional_columns_are_none() {
        let catalog = JobCatalog::from_csv(CSV).unwrap();
        let posting = catalog.find("Backend Engineer").unwrap();
        assert!(posting.company.is_none());
        assert!(posting.location.is_none());
    }

    #[test]
    fn test_titles_are_unique_and_ordered() {
        let catalog = JobCatalog::from_csv(CSV).unwrap();
        assert_eq!(catalog.titles(), vec!["Data Scientist", "Backend Engineer"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_padded_headers_are_accepted() {
        let catalog = JobCatalog::from_csv(
            " Job Title , Job Description , Company 
QA Engineer,Test things,Acme
",
        )
        .unwrap();
        let posting = catalog.find("qa engineer").unwrap();
        assert_eq!(posting.description, "Test things");
        assert_eq!(posting.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let catalog =
            JobCatalog::from_csv("Job Title,Job Description\nQA Engineer,Test things\n").unwrap();
        assert!(catalog.find("qa engineer").unwrap().company.is_none());
    }

    #[test]
    fn test_missing_required_columns() {
        let err = JobCatalog::from_csv("Title,Description\nA,B\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumns));
    }

    #[tokio::test]
    async fn test_csv_source_missing_file() {
        let source = CsvCatalogSource::new("/definitely/not/here/jobs.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_csv_source_header_only_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Job Title,Job Description").unwrap();
        let err = CsvCatalogSource::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[tokio::test]
    async fn test_csv_source_decodes_latin1() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Job Title,Job Description\nCaf\xe9 Manager,Run the caf\xe9\n")
            .unwrap();
        let catalog = CsvCatalogSource::new(file.path()).load().await.unwrap();
        let posting = catalog.find("café manager").unwrap();
        assert_eq!(posting.description, "Run the café");
    }

    #[tokio::test]
    async fn test_static_catalog_source_rejects_empty() {
        let source = Arc::new(JobCatalog::default());
        assert!(matches!(source.load().await, Err(CatalogError::Empty)));
    }
}
