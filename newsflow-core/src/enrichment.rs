//! Optional model-generated context attached to top-ranked articles.

use serde::{Deserialize, Serialize};

use crate::article::NewsArticle;

/// Summary, entities and relevance explanation for one article.
///
/// Every field is optional; an all-empty value is treated as "no enrichment"
/// and never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleEnrichment {
    pub summary: Option<String>,
    pub key_entities: Vec<String>,
    pub why_relevant: Option<String>,
}

impl ArticleEnrichment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.key_entities.is_empty() && self.why_relevant.is_none()
    }

    /// Fill fields that are absent here from `other`, keeping present ones.
    pub fn merge_missing(mut self, other: Self) -> Self {
        if self.summary.is_none() {
            self.summary = other.summary;
        }
        if self.key_entities.is_empty() {
            self.key_entities = other.key_entities;
        }
        if self.why_relevant.is_none() {
            self.why_relevant = other.why_relevant;
        }
        self
    }
}

/// Inputs for generating one article's enrichment.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentRequest<'a> {
    pub article: &'a NewsArticle,
    pub user_query: Option<&'a str>,
    pub user_latitude: Option<f64>,
    pub user_longitude: Option<f64>,
    /// How ranking matched the article, when enriching ranked results.
    pub match_reason: Option<&'a str>,
}
