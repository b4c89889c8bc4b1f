pub(crate) mod articles;
pub(crate) mod health;
pub(crate) mod metrics;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub(crate) fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/articles",
            post(articles::create_article).get(articles::list_articles),
        )
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .with_state(state)
}
