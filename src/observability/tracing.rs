use anyhow::{Error, Result};
use once_cell::sync::OnceCell;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global tracing subscriber exactly once.
///
/// Output is JSON unless `RUST_LOG_FORMAT=pretty`; the level filter comes from
/// `RUST_LOG` and defaults to `info`.
///
/// # Errors
/// Returns an error if another global subscriber was installed first.
pub fn init() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let use_json = std::env::var("RUST_LOG_FORMAT")
            .map(|v| v != "pretty")
            .unwrap_or(true);

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = if use_json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true)
                        .with_target(false),
                )
                .try_init()
        } else {
            registry.with(fmt::layer()).try_init()
        };
        result.map_err(|e| Error::msg(e.to_string()))?;

        info!(json = use_json, "tracing initialized");
        Ok::<(), Error>(())
    })?;
    Ok(())
}
