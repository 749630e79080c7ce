//! Response projections returned by the query and trending pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::article::NewsArticle;
use crate::enrichment::ArticleEnrichment;
use crate::query::{ParsedQuery, QueryFilters};
use crate::score::ArticleScore;

/// How the query was understood, echoed back for transparency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    pub original_query: String,
    pub intents: Vec<String>,
    pub entities: Vec<String>,
    pub concepts: Vec<String>,
    pub filters: QueryFilters,
    pub fallback_used: bool,
}

impl QueryMetadata {
    pub fn from_parsed(original_query: &str, parsed: &ParsedQuery) -> Self {
        Self {
            original_query: original_query.to_string(),
            intents: parsed
                .intents()
                .iter()
                .map(|intent| intent.label().to_string())
                .collect(),
            entities: parsed.entities().to_vec(),
            concepts: parsed.concepts().to_vec(),
            filters: parsed.filters().clone(),
            fallback_used: parsed.fallback_used(),
        }
    }
}

/// One ranked article as it appears in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleResult {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source_name: Option<String>,
    pub categories: Vec<String>,
    pub publication_date: Option<DateTime<Utc>>,
    pub latitude: f64,
    pub longitude: f64,
    pub relevance_score: Option<f64>,
    pub final_score: f64,
    pub distance_km: Option<f64>,
    pub match_reason: String,
    pub enrichment: Option<ArticleEnrichment>,
}

impl ArticleResult {
    pub fn from_score(score: ArticleScore, enrichment: Option<ArticleEnrichment>) -> Self {
        let ArticleScore {
            article,
            final_score,
            distance_km,
            match_reason,
            ..
        } = score;
        let NewsArticle {
            id,
            title,
            description,
            url,
            publication_date,
            source_name,
            relevance_score,
            latitude,
            longitude,
            categories,
        } = article;
        Self {
            id,
            title,
            description,
            url,
            source_name,
            categories,
            publication_date,
            latitude,
            longitude,
            relevance_score,
            final_score,
            distance_km,
            match_reason,
            enrichment: enrichment.filter(|e| !e.is_empty()),
        }
    }
}

/// Full response for a contextual news query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub metadata: QueryMetadata,
    pub articles: Vec<ArticleResult>,
    pub total_found: usize,
}

/// Feed parameters echoed with a trending response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingMetadata {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub limit: usize,
    pub cache_hit: bool,
    pub bucket_id: String,
}

/// One trending article with its decayed interaction score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingArticle {
    pub article: NewsArticle,
    pub trend_score: f64,
    pub distance_km: Option<f64>,
    pub enrichment: Option<ArticleEnrichment>,
}

/// Full response for a trending feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingResponse {
    pub metadata: TrendingMetadata,
    pub articles: Vec<TrendingArticle>,
}
