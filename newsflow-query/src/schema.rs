//! Serde schemas for language-model JSON payloads.
//!
//! Every field is optional so a partially conforming payload still decodes;
//! only structurally invalid JSON rejects.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

use newsflow_core::enrichment::ArticleEnrichment;
use newsflow_core::query::{ParsedQuery, QueryFilters};
use newsflow_core::{NewsResult, QueryIntent};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FilterPayload {
    pub category: Option<String>,
    pub source: Option<String>,
    pub score_threshold: Option<f64>,
    pub radius_km: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<FilterPayload> for QueryFilters {
    fn from(payload: FilterPayload) -> Self {
        QueryFilters {
            category: payload.category,
            source: payload.source,
            score_threshold: payload.score_threshold,
            radius_km: payload.radius_km,
            latitude: payload.latitude,
            longitude: payload.longitude,
            date_from: None,
            date_to: None,
        }
    }
}

/// Query-understanding payload: one primary intent plus optional extras.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QueryPayload {
    pub intent: Option<String>,
    pub additional_intents: Vec<String>,
    pub entities: Vec<String>,
    pub concepts: Vec<String>,
    pub filters: Option<FilterPayload>,
    pub search_query: Option<String>,
}

impl QueryPayload {
    pub fn into_parsed_query(self) -> ParsedQuery {
        let mut intents = BTreeSet::new();
        if let Some(intent) = &self.intent {
            intents.insert(QueryIntent::parse(intent));
        }
        for intent in &self.additional_intents {
            intents.insert(QueryIntent::parse(intent));
        }
        intents.remove(&QueryIntent::Unknown);
        let filters = self.filters.map(QueryFilters::from).unwrap_or_default();
        ParsedQuery::new(
            self.entities,
            self.concepts,
            intents,
            filters,
            self.search_query,
            false,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EnrichmentPayload {
    pub summary: Option<String>,
    pub key_entities: Vec<String>,
    pub why_relevant: Option<String>,
}

impl From<EnrichmentPayload> for ArticleEnrichment {
    fn from(payload: EnrichmentPayload) -> Self {
        ArticleEnrichment {
            summary: payload.summary,
            key_entities: payload.key_entities,
            why_relevant: payload.why_relevant,
        }
    }
}

pub(crate) fn decode_query(value: Value) -> NewsResult<ParsedQuery> {
    let payload: QueryPayload = serde_json::from_value(value)?;
    Ok(payload.into_parsed_query())
}

pub(crate) fn decode_enrichment(value: Value) -> NewsResult<ArticleEnrichment> {
    let payload: EnrichmentPayload = serde_json::from_value(value)?;
    Ok(payload.into())
}
