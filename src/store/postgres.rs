use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{debug, info};
use uuid::Uuid;

use super::ArticleStore;
use super::models::{Article, NewArticle};
use crate::error::StoreError;

const CREATE_ARTICLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS articles (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        summary TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        url TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL
    )
";

const CREATE_CREATED_AT_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS articles_created_at_idx
        ON articles (created_at DESC, id DESC)
";

const INSERT_ARTICLE: &str = r"
    INSERT INTO articles (id, title, content, summary, tags, url, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id
";

// Same ordering as the in-memory store: newest first, ties by id.
const SELECT_ARTICLES_NEWEST_FIRST: &str = r"
    SELECT id, title, content, summary, tags, url, created_at
    FROM articles
    ORDER BY created_at DESC, id DESC
";

/// Article store backed by a single PostgreSQL table.
#[derive(Debug, Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `articles` table and its ordering index when missing.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] when the DDL cannot be executed.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ARTICLES_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_CREATED_AT_INDEX).execute(&self.pool).await?;

        info!("articles schema ensured");
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn insert_one(&self, article: NewArticle) -> Result<Article, StoreError> {
        let id = Uuid::now_v7();

        let row = sqlx::query(INSERT_ARTICLE)
            .bind(id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.summary)
            .bind(&article.tags)
            .bind(&article.url)
            .bind(article.created_at)
            .fetch_one(&self.pool)
            .await?;

        let assigned: Uuid = row.try_get("id")?;
        debug!(article_id = %assigned, "article inserted");
        Ok(article.into_persisted(assigned))
    }

    async fn find_all(&self) -> Result<Vec<Article>, StoreError> {
        let rows = sqlx::query(SELECT_ARTICLES_NEWEST_FIRST)
            .fetch_all(&self.pool)
            .await?;

        // One bad row fails the whole listing.
        rows.iter()
            .map(decode_article)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn decode_article(row: &PgRow) -> Result<Article, sqlx::Error> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Article {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        summary: row.try_get("summary")?,
        tags: row.try_get("tags")?,
        url: row.try_get("url")?,
        created_at,
    })
}
