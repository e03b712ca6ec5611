mod catalog;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod notification;
mod persistence;
mod pipeline;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::{CatalogSource, CsvCatalogSource};
use crate::config::{Config, ScorerBackend};
use crate::db::create_pool;
use crate::extraction::LlmExtractor;
use crate::llm_client::LlmClient;
use crate::notification::SmtpNotifier;
use crate::persistence::SqliteResultStore;
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::scoring::{KeywordScorer, LlmScorer, Scorer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite and the applications table
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(SqliteResultStore::new(db));
    store.ensure_schema().await?;

    // Initialize LLM client
    let llm = LlmClient::new(&config.llm)?;
    info!("LLM client initialized (model: {})", llm.model());

    let scorer: Arc<dyn Scorer> = match config.scorer_backend {
        ScorerBackend::Llm => Arc::new(LlmScorer(llm.clone())),
        ScorerBackend::Keyword => Arc::new(KeywordScorer),
    };
    info!("Scorer backend: {:?}", config.scorer_backend);

    let catalog: Arc<dyn CatalogSource> =
        Arc::new(CsvCatalogSource::new(config.job_catalog_path.clone()));

    let pipeline = Pipeline::new(
        catalog.clone(),
        Arc::new(LlmExtractor(llm)),
        scorer,
        store.clone(),
        Arc::new(SmtpNotifier::new(config.smtp.clone())),
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        catalog,
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
