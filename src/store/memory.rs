use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ArticleStore;
use super::models::{self, Article, NewArticle};
use crate::error::StoreError;

/// Process-local article store.
///
/// Used for local runs without a database (`ARTICLE_STORE=memory`) and by the
/// test suites, which flip [`set_unavailable`](Self::set_unavailable) to
/// simulate an unreachable backend.
#[derive(Debug, Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<Vec<Article>>,
    unavailable: AtomicBool,
}

impl InMemoryArticleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored articles, regardless of availability.
    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn insert_one(&self, article: NewArticle) -> Result<Article, StoreError> {
        self.check_available()?;
        let persisted = article.into_persisted(Uuid::now_v7());
        self.articles.write().await.push(persisted.clone());
        Ok(persisted)
    }

    async fn find_all(&self) -> Result<Vec<Article>, StoreError> {
        self.check_available()?;
        let mut articles = self.articles.read().await.clone();
        models::sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
