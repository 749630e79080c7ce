//! Shared test doubles: in-memory stores, canned language models, and an
//! article builder.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use newsflow_core::enrichment::EnrichmentRequest;
use newsflow_core::geo::BucketId;
use newsflow_core::query::QueryContext;
use newsflow_core::traits::{retrieval_order, ArticleFilter, ArticleStore, LanguageModel, TrendStore};
use newsflow_core::trend::TrendAggregate;
use newsflow_core::{NewsArticle, NewsError, NewsResult};

/// Article store over a concurrent map, evaluating filters with the
/// reference predicate.
#[derive(Default)]
pub struct InMemoryArticleStore {
    articles: DashMap<Uuid, NewsArticle>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: impl IntoIterator<Item = NewsArticle>) -> Self {
        let store = Self::new();
        for article in articles {
            store.articles.insert(article.id, article);
        }
        store
    }

    pub fn insert(&self, article: NewsArticle) {
        self.articles.insert(article.id, article);
    }
}

impl ArticleStore for InMemoryArticleStore {
    fn find_by_id(&self, id: Uuid) -> NewsResult<Option<NewsArticle>> {
        Ok(self.articles.get(&id).map(|entry| entry.value().clone()))
    }

    fn find_by_filter(&self, filter: &ArticleFilter, limit: usize) -> NewsResult<Vec<NewsArticle>> {
        let mut matched: Vec<NewsArticle> = self
            .articles
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by(retrieval_order);
        matched.truncate(limit);
        Ok(matched)
    }

    fn count(&self) -> NewsResult<usize> {
        Ok(self.articles.len())
    }

    fn save_all(&self, articles: Vec<NewsArticle>) -> NewsResult<()> {
        for article in articles {
            self.articles.insert(article.id, article);
        }
        Ok(())
    }
}

/// Trend store over a concurrent map keyed by (bucket, article).
#[derive(Default)]
pub struct InMemoryTrendStore {
    aggregates: DashMap<(BucketId, Uuid), TrendAggregate>,
}

impl InMemoryTrendStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrendStore for InMemoryTrendStore {
    fn apply_event(
        &self,
        bucket: BucketId,
        article_id: Uuid,
        increment: f64,
        occurred_at: DateTime<Utc>,
        lambda: f64,
    ) -> NewsResult<TrendAggregate> {
        // The entry guard holds the map shard lock, serializing concurrent
        // writers for the same key.
        let mut entry = self
            .aggregates
            .entry((bucket, article_id))
            .or_insert_with(|| TrendAggregate::new(bucket, article_id, occurred_at));
        entry.register_event(increment, occurred_at, lambda);
        Ok(entry.value().clone())
    }

    fn find_in_buckets(&self, buckets: &[BucketId]) -> NewsResult<Vec<TrendAggregate>> {
        Ok(self
            .aggregates
            .iter()
            .filter(|entry| buckets.contains(&entry.key().0))
            .map(|entry| entry.value().clone())
            .collect())
    }
}

/// Model that reports itself disabled; calling it is a test failure.
pub struct DisabledModel;

impl LanguageModel for DisabledModel {
    fn enabled(&self) -> bool {
        false
    }

    fn complete_query(&self, _context: &QueryContext) -> NewsResult<Value> {
        panic!("disabled model must not be called");
    }

    fn complete_enrichment(&self, _request: &EnrichmentRequest<'_>) -> NewsResult<Value> {
        panic!("disabled model must not be called");
    }
}

/// Model returning fixed payloads.
pub struct StaticModel {
    pub query_payload: Value,
    pub enrichment_payload: Value,
}

impl LanguageModel for StaticModel {
    fn complete_query(&self, _context: &QueryContext) -> NewsResult<Value> {
        Ok(self.query_payload.clone())
    }

    fn complete_enrichment(&self, _request: &EnrichmentRequest<'_>) -> NewsResult<Value> {
        Ok(self.enrichment_payload.clone())
    }
}

/// Model whose every call fails, for exercising fallback paths.
pub struct FailingModel;

impl LanguageModel for FailingModel {
    fn complete_query(&self, _context: &QueryContext) -> NewsResult<Value> {
        Err(NewsError::Capability("model unavailable".to_string()))
    }

    fn complete_enrichment(&self, _request: &EnrichmentRequest<'_>) -> NewsResult<Value> {
        Err(NewsError::Capability("model unavailable".to_string()))
    }
}

/// Builder for corpus articles with sensible defaults.
pub struct ArticleBuilder {
    article: NewsArticle,
}

/// Start building an article with the given title.
pub fn article(title: &str) -> ArticleBuilder {
    ArticleBuilder {
        article: NewsArticle {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            url: None,
            publication_date: Some(Utc::now()),
            source_name: None,
            relevance_score: Some(0.5),
            latitude: 0.0,
            longitude: 0.0,
            categories: Vec::new(),
        },
    }
}

impl ArticleBuilder {
    pub fn id(mut self, id: Uuid) -> Self {
        self.article.id = id;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.article.description = Some(description.to_string());
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.article.source_name = Some(source.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.article.categories.push(category.to_string());
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.article.relevance_score = Some(score);
        self
    }

    pub fn unscored(mut self) -> Self {
        self.article.relevance_score = None;
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.article.latitude = latitude;
        self.article.longitude = longitude;
        self
    }

    pub fn published(mut self, date: DateTime<Utc>) -> Self {
        self.article.publication_date = Some(date);
        self
    }

    pub fn published_days_ago(mut self, days: i64) -> Self {
        self.article.publication_date = Some(Utc::now() - Duration::days(days));
        self
    }

    pub fn undated(mut self) -> Self {
        self.article.publication_date = None;
        self
    }

    pub fn build(self) -> NewsArticle {
        self.article
    }
}
