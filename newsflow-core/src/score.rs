//! Scored article wrappers flowing between retrieval, ranking and assembly.

use serde::{Deserialize, Serialize};

use crate::article::NewsArticle;

/// An article produced by one retrieval strategy, before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedArticle {
    pub article: NewsArticle,
    /// Name of the strategy that surfaced this article.
    pub strategy: &'static str,
    /// Strategy-local score in [0, 1]; feeds the proximity factor for
    /// nearby matches.
    pub primary_score: f64,
}

impl RetrievedArticle {
    pub fn new(article: NewsArticle, strategy: &'static str, primary_score: f64) -> Self {
        Self {
            article,
            strategy,
            primary_score,
        }
    }
}

/// Final ranked article with its per-factor contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleScore {
    pub article: NewsArticle,
    pub final_score: f64,
    pub distance_km: Option<f64>,
    pub match_reason: String,
    pub relevance_contribution: f64,
    pub recency_contribution: f64,
    pub semantic_contribution: f64,
    pub proximity_contribution: f64,
}
