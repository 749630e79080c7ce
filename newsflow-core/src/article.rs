use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A news article record as held by the article store collaborator.
///
/// Coordinates are required: every article in the corpus is geo-tagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
    pub source_name: Option<String>,
    /// Editorial relevance score in [0.0, 1.0] when present.
    pub relevance_score: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
}

impl NewsArticle {
    /// Relevance score normalized for scoring: absent or NaN is 0,
    /// anything else is clamped to [0.0, 1.0].
    pub fn relevance_or_zero(&self) -> f64 {
        match self.relevance_score {
            Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}
