use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An article as it exists in the store, identifier included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A fully enriched article that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl NewArticle {
    /// Attaches the identifier handed out by the store.
    #[must_use]
    pub fn into_persisted(self, id: Uuid) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            summary: self.summary,
            tags: self.tags,
            url: self.url,
            created_at: self.created_at,
        }
    }
}

/// Sorts newest first by `created_at`, breaking ties by descending `id`.
pub(crate) fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article_at(seconds: i64) -> Article {
        Article {
            id: Uuid::now_v7(),
            title: format!("t{seconds}"),
            content: String::new(),
            summary: "s".to_string(),
            tags: vec!["x".to_string()],
            url: String::new(),
            created_at: Utc.timestamp_opt(seconds, 0).single().expect("valid timestamp"),
        }
    }

    #[test]
    fn newest_first_sorts_descending() {
        let mut articles = vec![article_at(10), article_at(30), article_at(20)];
        sort_newest_first(&mut articles);
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["t30", "t20", "t10"]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_id() {
        let first = article_at(5);
        let second = article_at(5);
        let mut articles = vec![first.clone(), second.clone()];
        sort_newest_first(&mut articles);
        assert_eq!(articles[0].id, first.id.max(second.id));
    }

    #[test]
    fn article_serializes_with_stable_field_names() {
        let article = article_at(0);
        let value = serde_json::to_value(&article).expect("serializes");
        for field in ["id", "title", "content", "summary", "tags", "url", "created_at"] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
    }
}
