pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        .route(
            "/api/v1/jobs/:title/applications",
            get(handlers::handle_list_applications),
        )
        .route("/api/v1/screenings", post(handlers::handle_screen))
        .with_state(state)
}
