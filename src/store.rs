//! Persistence gateway for articles.
//!
//! The rest of the service only sees [`ArticleStore`]; the concrete backend is
//! picked once at startup and shared behind an `Arc<dyn ArticleStore>`.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;

pub use memory::InMemoryArticleStore;
pub use models::{Article, NewArticle};
pub use postgres::PgArticleStore;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Inserts a new article and returns it with the identifier the store assigned.
    async fn insert_one(&self, article: NewArticle) -> Result<Article, StoreError>;

    /// Returns every stored article, newest `created_at` first.
    async fn find_all(&self) -> Result<Vec<Article>, StoreError>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
