//! Trending interaction events and the decayed per-(bucket, article) score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::BucketId;
use crate::request::GeoPoint;

/// Interaction event types with their score weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendEventType {
    View,
    Click,
    Share,
}

impl TrendEventType {
    pub fn weight(self) -> f64 {
        match self {
            Self::View => 1.0,
            Self::Click => 3.0,
            Self::Share => 5.0,
        }
    }
}

/// An interaction event to ingest into the trending aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEvent {
    pub event_type: TrendEventType,
    pub article_id: Uuid,
    /// Where the interaction happened; falls back to the article's own
    /// coordinates when absent.
    pub location: Option<GeoPoint>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Decayed interaction score for one (bucket, article) pair.
///
/// Created lazily on the first event for the pair; never deleted — decay
/// makes stale entries asymptotically irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAggregate {
    pub bucket: BucketId,
    pub article_id: Uuid,
    pub score: f64,
    pub event_count: u64,
    pub last_interaction_at: DateTime<Utc>,
}

impl TrendAggregate {
    pub fn new(bucket: BucketId, article_id: Uuid, occurred_at: DateTime<Utc>) -> Self {
        Self {
            bucket,
            article_id,
            score: 0.0,
            event_count: 0,
            last_interaction_at: occurred_at,
        }
    }

    /// Decay the stored score to `occurred_at`, then add `increment`.
    pub fn register_event(&mut self, increment: f64, occurred_at: DateTime<Utc>, lambda: f64) {
        let decayed = self.decayed_score(occurred_at, lambda);
        self.score = decayed + increment;
        self.event_count += 1;
        self.last_interaction_at = occurred_at;
    }

    /// Stored score decayed to `reference`: `score · e^(-λ · minutes)`.
    ///
    /// Non-positive stored scores clamp to 0. Elapsed time runs in whole
    /// minutes and never backwards.
    pub fn decayed_score(&self, reference: DateTime<Utc>, lambda: f64) -> f64 {
        if self.score <= 0.0 {
            return 0.0;
        }
        let minutes = (reference - self.last_interaction_at).num_minutes().max(0) as f64;
        self.score * (-lambda * minutes).exp()
    }
}
