pub mod metrics;
pub mod tracing;

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Encoder, Registry, TextEncoder};

use self::metrics::Metrics;

/// Owns the Prometheus registry and the service's collectors.
#[derive(Debug, Clone)]
pub struct Telemetry {
    registry: Arc<Registry>,
    metrics: Arc<Metrics>,
}

impl Telemetry {
    /// Creates a telemetry handle with a private registry.
    ///
    /// # Errors
    /// Returns an error when the collectors cannot be registered.
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let metrics =
            Arc::new(Metrics::new(&registry).context("failed to register prometheus metrics")?);
        Ok(Self { registry, metrics })
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn metrics_arc(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub fn record_ready_probe(&self) {
        self.metrics.health_probes.with_label_values(&["ready"]).inc();
    }

    pub fn record_live_probe(&self) {
        self.metrics.health_probes.with_label_values(&["live"]).inc();
    }

    /// Renders the registry in the Prometheus text exposition format.
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
            ::tracing::warn!(%error, "failed to encode prometheus metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
