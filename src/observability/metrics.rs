/// Prometheus metric definitions.
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry,
};

use crate::clients::summarizer::EnrichmentFailure;

/// Outcome label for `article_ingestions_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Enriched,
    Fallback,
    Failed,
}

impl IngestOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IngestOutcome::Enriched => "enriched",
            IngestOutcome::Fallback => "fallback",
            IngestOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Metrics {
    pub ingestions: IntCounterVec,
    pub enrichment_failures: IntCounterVec,
    pub listings: IntCounter,
    pub health_probes: IntCounterVec,

    pub enrichment_duration: Histogram,
    pub list_duration: Histogram,
}

impl Metrics {
    /// Registers every collector on `registry`.
    ///
    /// # Errors
    /// Fails when a collector with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            ingestions: register_int_counter_vec_with_registry!(
                Opts::new(
                    "article_ingestions_total",
                    "Article submissions by ingestion outcome"
                ),
                &["outcome"],
                registry
            )?,
            enrichment_failures: register_int_counter_vec_with_registry!(
                Opts::new(
                    "article_enrichment_failures_total",
                    "Summarizer calls that ended in a failure, by reason"
                ),
                &["reason"],
                registry
            )?,
            listings: register_int_counter_with_registry!(
                "article_listings_total",
                "Number of article listings served",
                registry
            )?,
            health_probes: register_int_counter_vec_with_registry!(
                Opts::new(
                    "article_health_probes_total",
                    "Health probe requests by probe kind"
                ),
                &["probe"],
                registry
            )?,
            enrichment_duration: register_histogram_with_registry!(
                HistogramOpts::new(
                    "article_enrichment_duration_seconds",
                    "Latency of summarizer calls"
                )
                .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 90.0]),
                registry
            )?,
            list_duration: register_histogram_with_registry!(
                HistogramOpts::new("article_list_duration_seconds", "Latency of article listings")
                    .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
                registry
            )?,
        })
    }

    pub fn record_ingestion(&self, outcome: IngestOutcome) {
        self.ingestions.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_enrichment_failure(&self, failure: &EnrichmentFailure) {
        self.enrichment_failures
            .with_label_values(&[failure.label()])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_labels_independently() {
        let registry = Registry::new();
        let metrics = Metrics::new(&registry).expect("metrics register");

        metrics.record_ingestion(IngestOutcome::Enriched);
        metrics.record_ingestion(IngestOutcome::Fallback);
        metrics.record_ingestion(IngestOutcome::Fallback);
        metrics.record_enrichment_failure(&EnrichmentFailure::ServiceError(503));

        assert_eq!(metrics.ingestions.with_label_values(&["enriched"]).get(), 1);
        assert_eq!(metrics.ingestions.with_label_values(&["fallback"]).get(), 2);
        assert_eq!(
            metrics
                .enrichment_failures
                .with_label_values(&["service_error"])
                .get(),
            1
        );
    }

    #[test]
    fn registering_twice_on_one_registry_fails() {
        let registry = Registry::new();
        Metrics::new(&registry).expect("first registration");
        assert!(Metrics::new(&registry).is_err());
    }
}
