use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::error::ListError;
use crate::observability::metrics::Metrics;
use crate::store::{Article, ArticleStore};

/// Read side of the service: every stored article, newest first.
pub struct ListingService {
    store: Arc<dyn ArticleStore>,
    metrics: Arc<Metrics>,
    deadline: Duration,
}

impl ListingService {
    pub fn new(store: Arc<dyn ArticleStore>, metrics: Arc<Metrics>, deadline: Duration) -> Self {
        Self {
            store,
            metrics,
            deadline,
        }
    }

    /// Fetches all articles sorted by `created_at` descending.
    ///
    /// # Errors
    /// Any store fault or an expired deadline aborts the whole listing.
    pub async fn list_all(&self) -> Result<Vec<Article>, ListError> {
        let timer = self.metrics.list_duration.start_timer();
        let result = match tokio::time::timeout(self.deadline, self.store.find_all()).await {
            Ok(Ok(articles)) => Ok(articles),
            Ok(Err(store_error)) => {
                error!(error = %store_error, "failed to list articles");
                Err(ListError::Store(store_error))
            }
            Err(_) => {
                error!(
                    deadline_secs = self.deadline.as_secs(),
                    "article listing deadline exceeded"
                );
                Err(ListError::DeadlineExceeded(self.deadline))
            }
        };
        timer.observe_duration();

        let articles = result?;
        self.metrics.listings.inc();
        debug!(count = articles.len(), "articles listed");
        Ok(articles)
    }
}
