use anyhow::Context;
use tracing::{error, info};

use article_digest::{
    app::{ComponentRegistry, build_router},
    config::Config,
    observability, server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                thread = thread_name,
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(
                thread = thread_name,
                message, "panic occurred without location information"
            );
        }
    }));

    // A missing .env is normal outside local development.
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    observability::tracing::init().context("failed to initialize tracing")?;
    if !dotenv_loaded {
        info!("no .env file found, reading configuration from the environment");
    }

    let config = Config::from_env().context("failed to load configuration")?;
    let bind_addr = config.http_bind();
    info!(
        store = ?config.store_backend(),
        summarizer = config.summarizer_base_url(),
        summarizer_timeout_secs = config.summarizer_timeout().as_secs(),
        ingest_deadline_secs = config.ingest_deadline().as_secs(),
        "configuration loaded"
    );

    let registry = ComponentRegistry::build(config)
        .await
        .context("failed to build component registry")?;
    let router = build_router(registry);

    server::serve(router, bind_addr)
        .await
        .context("http server failed")?;

    Ok(())
}
