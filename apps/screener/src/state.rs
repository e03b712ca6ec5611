use std::sync::Arc;

use crate::catalog::CatalogSource;
use crate::persistence::SqliteResultStore;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Same source the pipeline loads from, so the job list matches what runs accept.
    pub catalog: Arc<dyn CatalogSource>,
    pub store: Arc<SqliteResultStore>,
}
