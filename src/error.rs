use std::time::Duration;

use thiserror::Error;

/// Failures raised by an [`ArticleStore`](crate::store::ArticleStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("article store unavailable: {0}")]
    Unavailable(String),

    #[error("article store query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors surfaced by the ingestion flow.
///
/// Enrichment problems never show up here; they are absorbed by the
/// fallback branch of the orchestrator.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to persist article: {0}")]
    Persistence(#[from] StoreError),

    #[error("ingestion exceeded its deadline of {}s", .0.as_secs())]
    DeadlineExceeded(Duration),
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to list articles: {0}")]
    Store(#[from] StoreError),

    #[error("listing exceeded its deadline of {}s", .0.as_secs())]
    DeadlineExceeded(Duration),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
