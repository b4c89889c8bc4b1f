use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    api,
    clients::SummarizerClient,
    config::{Config, StoreBackend},
    ingest::IngestOrchestrator,
    listing::ListingService,
    observability::Telemetry,
    store::{ArticleStore, InMemoryArticleStore, PgArticleStore},
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

/// Every long-lived component, built once at startup and shared by handlers.
pub struct ComponentRegistry {
    config: Arc<Config>,
    telemetry: Telemetry,
    summarizer: Arc<SummarizerClient>,
    store: Arc<dyn ArticleStore>,
    orchestrator: Arc<IngestOrchestrator>,
    listing: Arc<ListingService>,
    cors_origin: HeaderValue,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn summarizer(&self) -> Arc<SummarizerClient> {
        Arc::clone(&self.registry.summarizer)
    }

    pub(crate) fn store(&self) -> Arc<dyn ArticleStore> {
        Arc::clone(&self.registry.store)
    }

    pub(crate) fn orchestrator(&self) -> Arc<IngestOrchestrator> {
        Arc::clone(&self.registry.orchestrator)
    }

    pub(crate) fn listing(&self) -> Arc<ListingService> {
        Arc::clone(&self.registry.listing)
    }
}

impl ComponentRegistry {
    /// Builds the registry with the store backend selected by `config`.
    ///
    /// For Postgres the pool is created lazily and the `articles` schema is
    /// ensured before returning.
    ///
    /// # Errors
    /// Fails when the pool cannot be configured, the schema cannot be created,
    /// or any client fails to build.
    pub async fn build(config: Config) -> Result<Self> {
        let store: Arc<dyn ArticleStore> = match config.store_backend() {
            StoreBackend::Postgres => {
                let dsn = config
                    .article_db_dsn()
                    .context("ARTICLE_DB_DSN is required for the postgres store")?;
                let pool = PgPoolOptions::new()
                    .max_connections(config.article_db_max_connections())
                    .min_connections(config.article_db_min_connections())
                    .acquire_timeout(config.article_db_acquire_timeout())
                    .test_before_acquire(true)
                    .connect_lazy(dsn)
                    .context("failed to configure article_db connection pool")?;
                let store = PgArticleStore::new(pool);
                store
                    .ensure_schema()
                    .await
                    .context("failed to ensure articles schema")?;
                Arc::new(store)
            }
            StoreBackend::Memory => {
                info!("using in-memory article store; data is lost on restart");
                Arc::new(InMemoryArticleStore::new())
            }
        };

        Self::with_store(config, store)
    }

    /// Builds the registry around an already constructed store.
    ///
    /// # Errors
    /// Fails when the configuration is inconsistent, the summarizer client
    /// cannot be built, or the CORS origin is not a valid header value.
    pub fn with_store(config: Config, store: Arc<dyn ArticleStore>) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let config = Arc::new(config);
        let telemetry = Telemetry::new()?;

        let summarizer = Arc::new(SummarizerClient::new(
            config.summarizer_base_url(),
            config.summarizer_connect_timeout(),
            config.summarizer_timeout(),
        )?);
        let orchestrator = Arc::new(IngestOrchestrator::new(
            Arc::clone(&summarizer),
            Arc::clone(&store),
            telemetry.metrics_arc(),
            config.ingest_deadline(),
        ));
        let listing = Arc::new(ListingService::new(
            Arc::clone(&store),
            telemetry.metrics_arc(),
            config.list_deadline(),
        ));
        let cors_origin = HeaderValue::from_str(config.cors_allowed_origin())
            .context("invalid CORS_ALLOWED_ORIGIN")?;

        Ok(Self {
            config,
            telemetry,
            summarizer,
            store,
            orchestrator,
            listing,
            cors_origin,
        })
    }

    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.cors_origin.clone())
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_LENGTH])
            .allow_credentials(true)
            .max_age(Duration::from_secs(12 * 60 * 60))
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let cors = registry.cors_layer();
    let state = AppState::new(registry);
    api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
