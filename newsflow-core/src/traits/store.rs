use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::article::NewsArticle;
use crate::errors::NewsResult;
use crate::geo::BucketId;
use crate::trend::TrendAggregate;

/// Filler words stripped from free-text search tokens.
const STOP_WORDS: &[&str] = &[
    "news", "latest", "today", "top", "breaking", "update", "updates", "near", "about", "around",
];

/// Inclusive latitude/longitude box used for coarse geo pre-filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Conjunctive article predicate; every populated field must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    /// Case-insensitive exact match against any of the article's categories.
    pub category: Option<String>,
    /// Case-insensitive exact match against the source name.
    pub source: Option<String>,
    /// Articles with a relevance score at or above this value.
    pub min_score: Option<f64>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub bounding_box: Option<BoundingBox>,
    /// Free-text search over title and description.
    pub search_text: Option<String>,
}

impl ArticleFilter {
    /// Reference semantics for the filter; in-memory stores evaluate this
    /// directly, indexed stores must match it.
    pub fn matches(&self, article: &NewsArticle) -> bool {
        if let Some(category) = &self.category {
            let wanted = category.to_lowercase();
            if !article
                .categories
                .iter()
                .any(|c| c.to_lowercase() == wanted)
            {
                return false;
            }
        }
        if let Some(source) = &self.source {
            let wanted = source.to_lowercase();
            match &article.source_name {
                Some(name) if name.to_lowercase() == wanted => {}
                _ => return false,
            }
        }
        if let Some(min_score) = self.min_score {
            if article.relevance_or_zero() < min_score {
                return false;
            }
        }
        if let Some(after) = self.published_after {
            match article.publication_date {
                Some(date) if date >= after => {}
                _ => return false,
            }
        }
        if let Some(before) = self.published_before {
            match article.publication_date {
                Some(date) if date <= before => {}
                _ => return false,
            }
        }
        if let Some(bbox) = &self.bounding_box {
            if !bbox.contains(article.latitude, article.longitude) {
                return false;
            }
        }
        if let Some(search) = &self.search_text {
            if !Self::matches_search(article, search) {
                return false;
            }
        }
        true
    }

    /// The whole phrase as a substring, or every meaningful token present
    /// somewhere in the title or description.
    fn matches_search(article: &NewsArticle, search: &str) -> bool {
        let phrase = search.trim().to_lowercase();
        if phrase.is_empty() {
            return true;
        }
        let title = article.title.to_lowercase();
        let description = article
            .description
            .as_deref()
            .unwrap_or("")
            .to_lowercase();
        if title.contains(&phrase) || description.contains(&phrase) {
            return true;
        }
        let tokens: Vec<&str> = phrase
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 2 && !STOP_WORDS.contains(t))
            .collect();
        if tokens.is_empty() {
            return false;
        }
        tokens
            .iter()
            .all(|token| title.contains(token) || description.contains(token))
    }
}

/// Canonical result ordering for store queries: relevance score descending,
/// then publication date descending. Missing values sort last.
pub fn retrieval_order(a: &NewsArticle, b: &NewsArticle) -> Ordering {
    b.relevance_or_zero()
        .partial_cmp(&a.relevance_or_zero())
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.publication_date.cmp(&a.publication_date))
}

/// Read access to the article corpus.
pub trait ArticleStore: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> NewsResult<Option<NewsArticle>>;

    /// Articles matching `filter`, in [`retrieval_order`], at most `limit`.
    fn find_by_filter(&self, filter: &ArticleFilter, limit: usize) -> NewsResult<Vec<NewsArticle>>;

    fn count(&self) -> NewsResult<usize>;

    fn save_all(&self, articles: Vec<NewsArticle>) -> NewsResult<()>;
}

/// Persistence for per-(bucket, article) trend aggregates.
pub trait TrendStore: Send + Sync {
    /// Decay-then-increment the aggregate for one (bucket, article) pair,
    /// creating it on the first event. Implementations serialize concurrent
    /// calls for the same key, so no update is lost.
    fn apply_event(
        &self,
        bucket: BucketId,
        article_id: Uuid,
        increment: f64,
        occurred_at: DateTime<Utc>,
        lambda: f64,
    ) -> NewsResult<TrendAggregate>;

    /// All aggregates in any of the given buckets.
    fn find_in_buckets(&self, buckets: &[BucketId]) -> NewsResult<Vec<TrendAggregate>>;
}
