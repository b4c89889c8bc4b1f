//! Submission flow: enrich once, fall back on failure, persist exactly one record.

pub mod fallback;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, warn};

use crate::clients::SummarizerClient;
use crate::clients::summarizer::{EnrichmentOutcome, EnrichmentRequest};
use crate::error::IngestError;
use crate::observability::metrics::{IngestOutcome, Metrics};
use crate::store::{Article, ArticleStore, NewArticle};

pub use fallback::{FALLBACK_SUMMARY, FALLBACK_TAG, FALLBACK_TITLE};

/// Body accepted by `POST /articles`. Absent or `null` fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

impl ArticleSubmission {
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub article: Article,
    pub title: String,
}

pub struct IngestOrchestrator {
    summarizer: Arc<SummarizerClient>,
    store: Arc<dyn ArticleStore>,
    metrics: Arc<Metrics>,
    deadline: Duration,
}

impl IngestOrchestrator {
    pub fn new(
        summarizer: Arc<SummarizerClient>,
        store: Arc<dyn ArticleStore>,
        metrics: Arc<Metrics>,
        deadline: Duration,
    ) -> Self {
        Self {
            summarizer,
            store,
            metrics,
            deadline,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Enriches and persists one submission within the ingest deadline.
    ///
    /// A degraded summarizer never fails the call; only the store or the
    /// deadline can. The deadline bounds enrichment and resolution. Once the
    /// insert has been issued it is awaited to completion, so a deadline error
    /// always means nothing was written.
    ///
    /// # Errors
    /// [`IngestError::Persistence`] when the insert fails and
    /// [`IngestError::DeadlineExceeded`] when enrichment runs out of time.
    pub async fn ingest(&self, submission: ArticleSubmission) -> Result<IngestReceipt, IngestError> {
        let Ok((article, outcome)) =
            tokio::time::timeout(self.deadline, self.prepare(submission)).await
        else {
            self.metrics.record_ingestion(IngestOutcome::Failed);
            error!(
                deadline_secs = self.deadline.as_secs(),
                "ingestion deadline exceeded before persistence"
            );
            return Err(IngestError::DeadlineExceeded(self.deadline));
        };

        self.persist(article, outcome).await
    }

    async fn prepare(&self, submission: ArticleSubmission) -> (NewArticle, IngestOutcome) {
        let ArticleSubmission {
            title: caller_title,
            content,
            url,
        } = submission;

        let request = EnrichmentRequest::new(content, url);
        let timer = self.metrics.enrichment_duration.start_timer();
        let outcome = self.summarizer.enrich(&request).await;
        timer.observe_duration();

        let ingest_outcome = match &outcome {
            EnrichmentOutcome::Success(enrichment) => {
                info!(
                    title = %enrichment.title,
                    source_url = %request.url,
                    "summarizer enrichment succeeded"
                );
                IngestOutcome::Enriched
            }
            EnrichmentOutcome::Failure(failure) => {
                self.metrics.record_enrichment_failure(failure);
                warn!(
                    reason = %failure,
                    source_url = %request.url,
                    "summarizer enrichment failed; applying fallback"
                );
                IngestOutcome::Fallback
            }
        };

        let fields = fallback::resolve(&caller_title, &outcome);
        let EnrichmentRequest { content, url } = request;
        let article = NewArticle {
            title: fields.title,
            content,
            summary: fields.summary,
            tags: fields.tags,
            url,
            created_at: Utc::now(),
        };
        (article, ingest_outcome)
    }

    async fn persist(
        &self,
        article: NewArticle,
        ingest_outcome: IngestOutcome,
    ) -> Result<IngestReceipt, IngestError> {
        let persisted = match self.store.insert_one(article).await {
            Ok(persisted) => persisted,
            Err(store_error) => {
                self.metrics.record_ingestion(IngestOutcome::Failed);
                error!(error = %store_error, "failed to persist article");
                return Err(IngestError::Persistence(store_error));
            }
        };

        self.metrics.record_ingestion(ingest_outcome);
        info!(
            article_id = %persisted.id,
            outcome = ingest_outcome.as_str(),
            "article ingested"
        );

        Ok(IngestReceipt {
            title: persisted.title.clone(),
            article: persisted,
        })
    }
}
