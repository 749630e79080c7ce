//! Corpus bootstrap: load seed articles into an empty store.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::article::NewsArticle;
use crate::errors::NewsResult;
use crate::traits::ArticleStore;

/// One article as it appears in a JSON seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleDocument {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ArticleDocument {
    pub fn into_article(self) -> NewsArticle {
        NewsArticle {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: self.title,
            description: self.description,
            url: self.url,
            publication_date: self.publication_date,
            source_name: self.source_name,
            relevance_score: self.relevance_score,
            latitude: self.latitude,
            longitude: self.longitude,
            categories: self.categories,
        }
    }
}

/// Parse a JSON array of seed articles.
pub fn parse_seed(raw: &str) -> NewsResult<Vec<ArticleDocument>> {
    let documents: Vec<ArticleDocument> = serde_json::from_str(raw)?;
    Ok(documents)
}

/// Load seed articles into `store` unless it already holds data.
///
/// Returns the number of articles inserted; 0 means the store was already
/// populated and the seed was skipped.
pub fn seed_articles(store: &dyn ArticleStore, raw: &str) -> NewsResult<usize> {
    let existing = store.count()?;
    if existing > 0 {
        info!(existing, "article store already populated, skipping seed");
        return Ok(0);
    }
    let articles: Vec<NewsArticle> = parse_seed(raw)?
        .into_iter()
        .map(ArticleDocument::into_article)
        .collect();
    let inserted = articles.len();
    store.save_all(articles)?;
    info!(inserted, "seeded article corpus");
    Ok(inserted)
}
