use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::QueryIntent;

/// Structured filters extracted from a query or supplied by the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFilters {
    pub category: Option<String>,
    pub source: Option<String>,
    pub score_threshold: Option<f64>,
    pub radius_km: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Geo-context handed to query understanding alongside the raw query text.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    pub query: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub score_threshold: Option<f64>,
}

/// Immutable result of query understanding.
///
/// Invariant: `intents` is never empty and always contains `Search`.
/// Construction goes through [`ParsedQuery::new`], which enforces it.
/// Later filter adjustments produce a new value via [`ParsedQuery::with_filters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    entities: Vec<String>,
    concepts: Vec<String>,
    intents: BTreeSet<QueryIntent>,
    filters: QueryFilters,
    search_query: Option<String>,
    fallback_used: bool,
}

impl ParsedQuery {
    pub fn new(
        entities: Vec<String>,
        concepts: Vec<String>,
        mut intents: BTreeSet<QueryIntent>,
        filters: QueryFilters,
        search_query: Option<String>,
        fallback_used: bool,
    ) -> Self {
        intents.insert(QueryIntent::Search);
        let search_query = search_query.filter(|s| !s.trim().is_empty());
        Self {
            entities,
            concepts,
            intents,
            filters,
            search_query,
            fallback_used,
        }
    }

    /// Minimal parse used when nothing could be extracted from the query.
    pub fn fallback(query: &str) -> Self {
        Self::new(
            Vec::new(),
            Vec::new(),
            BTreeSet::new(),
            QueryFilters::default(),
            Some(query.to_string()),
            true,
        )
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }

    pub fn intents(&self) -> &BTreeSet<QueryIntent> {
        &self.intents
    }

    pub fn filters(&self) -> &QueryFilters {
        &self.filters
    }

    /// Normalized search query: never blank when present.
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    pub fn fallback_used(&self) -> bool {
        self.fallback_used
    }

    pub fn has_intent(&self, intent: QueryIntent) -> bool {
        self.intents.contains(&intent)
    }

    /// Reconstruct with different filters; everything else is carried over.
    pub fn with_filters(&self, filters: QueryFilters) -> Self {
        Self {
            filters,
            ..self.clone()
        }
    }

    /// Reconstruct with an extra intent added.
    pub fn with_intent(&self, intent: QueryIntent) -> Self {
        let mut intents = self.intents.clone();
        intents.insert(intent);
        Self {
            intents,
            ..self.clone()
        }
    }

    /// Reconstruct with the fallback flag raised.
    pub fn with_fallback(self) -> Self {
        if self.fallback_used {
            return self;
        }
        Self {
            fallback_used: true,
            ..self
        }
    }
}
