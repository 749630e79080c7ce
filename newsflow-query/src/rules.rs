//! Deterministic rule-based query understanding and enrichment.
//!
//! This is the floor the language model path degrades to; it must never fail.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use newsflow_core::enrichment::{ArticleEnrichment, EnrichmentRequest};
use newsflow_core::query::{ParsedQuery, QueryContext, QueryFilters};
use newsflow_core::QueryIntent;

/// Capitalized word runs, e.g. "New York" or "Tesla".
static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)\b").unwrap());

/// Category vocabulary in priority order; the first one mentioned in the
/// query wins. Order is fixed so detection is deterministic.
const KNOWN_CATEGORIES: &[&str] = &[
    "general",
    "technology",
    "business",
    "sports",
    "entertainment",
    "health",
    "science",
    "politics",
    "world",
];

/// Source mentions mapped to canonical source names.
const KNOWN_SOURCES: &[(&str, &str)] = &[
    ("new york times", "New York Times"),
    ("reuters", "Reuters"),
    ("bbc", "BBC"),
];

const PROXIMITY_WORDS: &[&str] = &["near", "around", "close to"];
const SCORE_WORDS: &[&str] = &["score", "rank"];

const MAX_CONCEPTS: usize = 10;
const MAX_HIGHLIGHTED_ENTITIES: usize = 3;
const SUMMARY_MAX_CHARS: usize = 220;
const SUMMARY_TRUNCATE_CHARS: usize = 217;

/// Heuristic query parser and enrichment generator.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse a query with keyword heuristics. Always succeeds.
    pub fn parse_query(&self, context: &QueryContext) -> ParsedQuery {
        let query = context.query.as_str();
        let normalized = query.to_lowercase();
        let mut intents = BTreeSet::new();
        let mut filters = QueryFilters {
            score_threshold: context.score_threshold,
            radius_km: context.radius_km,
            latitude: context.latitude,
            longitude: context.longitude,
            ..Default::default()
        };

        if let Some(category) = detect_category(&normalized) {
            intents.insert(QueryIntent::Category);
            filters.category = Some(category.to_string());
        }
        if let Some(source) = detect_source(&normalized) {
            intents.insert(QueryIntent::Source);
            filters.source = Some(source.to_string());
        }
        if PROXIMITY_WORDS.iter().any(|word| normalized.contains(word))
            || context.radius_km.is_some()
        {
            intents.insert(QueryIntent::Nearby);
        }
        if SCORE_WORDS.iter().any(|word| normalized.contains(word))
            || context.score_threshold.is_some()
        {
            intents.insert(QueryIntent::Score);
        }

        let entities = extract_entities(query);
        let concepts = extract_concepts(&normalized);
        let search = build_search_query(query, filters.category.as_deref(), filters.source.as_deref());

        debug!(
            intents = intents.len(),
            entities = entities.len(),
            "rule-based parse"
        );
        ParsedQuery::new(entities, concepts, intents, filters, Some(search), false)
    }

    /// Enrichment from the article text alone. Always succeeds.
    pub fn generate_enrichment(&self, request: &EnrichmentRequest<'_>) -> ArticleEnrichment {
        let article = request.article;
        let summary = build_summary(
            article.description.as_deref(),
            &article.title,
            article.source_name.as_deref(),
        );
        let mut entity_text = article.title.clone();
        if let Some(description) = &article.description {
            entity_text.push(' ');
            entity_text.push_str(description);
        }
        let key_entities = extract_entities(&entity_text);
        let why_relevant = build_why_relevant(request, &key_entities);
        ArticleEnrichment {
            summary,
            key_entities,
            why_relevant,
        }
    }
}

fn detect_category(normalized: &str) -> Option<&'static str> {
    KNOWN_CATEGORIES
        .iter()
        .find(|category| normalized.contains(*category))
        .copied()
}

fn detect_source(normalized: &str) -> Option<&'static str> {
    KNOWN_SOURCES
        .iter()
        .find(|(mention, _)| normalized.contains(mention))
        .map(|(_, canonical)| *canonical)
}

/// Capitalized runs longer than two characters, deduplicated in order.
fn extract_entities(text: &str) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    for capture in ENTITY_PATTERN.captures_iter(text) {
        let candidate = capture[1].trim();
        if candidate.len() > 2 && !entities.iter().any(|e| e == candidate) {
            entities.push(candidate.to_string());
        }
    }
    entities
}

/// Whitespace tokens longer than three characters, deduplicated, capped.
fn extract_concepts(normalized: &str) -> Vec<String> {
    let mut concepts: Vec<String> = Vec::new();
    for token in normalized.split_whitespace() {
        if token.len() > 3 && !concepts.iter().any(|c| c == token) {
            concepts.push(token.to_string());
        }
        if concepts.len() == MAX_CONCEPTS {
            break;
        }
    }
    concepts
}

/// The raw query widened with any detected category and source so the search
/// strategy still sees them.
fn build_search_query(query: &str, category: Option<&str>, source: Option<&str>) -> String {
    let mut search = query.to_string();
    if let Some(category) = category {
        search.push(' ');
        search.push_str(category);
    }
    if let Some(source) = source {
        search.push(' ');
        search.push_str(source);
    }
    search
}

fn build_summary(
    description: Option<&str>,
    title: &str,
    source_name: Option<&str>,
) -> Option<String> {
    let base = match description {
        Some(text) if !text.trim().is_empty() => text,
        _ => title,
    };
    if base.is_empty() {
        return None;
    }
    let mut summary = if base.chars().count() > SUMMARY_MAX_CHARS {
        let truncated: String = base.chars().take(SUMMARY_TRUNCATE_CHARS).collect();
        format!("{truncated}...")
    } else {
        base.to_string()
    };
    if let Some(source) = source_name {
        summary.push_str(" from ");
        summary.push_str(source);
    }
    Some(summary)
}

fn build_why_relevant(request: &EnrichmentRequest<'_>, key_entities: &[String]) -> Option<String> {
    let mut reasons: Vec<String> = Vec::new();
    if let Some(reason) = request.match_reason {
        reasons.push(format!("Matched by {reason}"));
    }
    if request.user_latitude.is_some() && request.user_longitude.is_some() {
        reasons.push("Geographically relevant to your location".to_string());
    }
    if !key_entities.is_empty() {
        let highlights: Vec<&str> = key_entities
            .iter()
            .take(MAX_HIGHLIGHTED_ENTITIES)
            .map(String::as_str)
            .collect();
        reasons.push(format!("Highlights: {}", highlights.join(", ")));
    }
    if reasons.is_empty() {
        None
    } else {
        Some(reasons.join(". "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use newsflow_core::NewsArticle;
    use uuid::Uuid;

    fn context(query: &str) -> QueryContext {
        QueryContext {
            query: query.to_string(),
            latitude: None,
            longitude: None,
            radius_km: None,
            score_threshold: None,
        }
    }

    fn article() -> NewsArticle {
        NewsArticle {
            id: Uuid::new_v4(),
            title: "Tesla opens Berlin factory".to_string(),
            description: Some("Tesla expands European production with a new plant".to_string()),
            url: None,
            publication_date: Some(Utc::now()),
            source_name: Some("Reuters".to_string()),
            relevance_score: Some(0.8),
            latitude: 52.52,
            longitude: 13.4,
            categories: vec!["business".to_string()],
        }
    }

    #[test]
    fn category_mention_sets_intent_and_filter() {
        let extractor = RuleBasedExtractor::new();
        let parsed = extractor.parse_query(&context("latest technology news"));
        assert!(parsed.has_intent(QueryIntent::Category));
        assert_eq!(parsed.filters().category.as_deref(), Some("technology"));
    }

    #[test]
    fn source_mention_maps_to_canonical_name() {
        let extractor = RuleBasedExtractor::new();
        let parsed = extractor.parse_query(&context("what does the bbc say"));
        assert!(parsed.has_intent(QueryIntent::Source));
        assert_eq!(parsed.filters().source.as_deref(), Some("BBC"));
    }

    #[test]
    fn proximity_words_set_nearby_intent() {
        let extractor = RuleBasedExtractor::new();
        let parsed = extractor.parse_query(&context("events near me"));
        assert!(parsed.has_intent(QueryIntent::Nearby));
    }

    #[test]
    fn supplied_radius_sets_nearby_intent() {
        let extractor = RuleBasedExtractor::new();
        let mut ctx = context("city events");
        ctx.radius_km = Some(15.0);
        assert!(extractor.parse_query(&ctx).has_intent(QueryIntent::Nearby));
    }

    #[test]
    fn score_intent_from_words_or_threshold() {
        let extractor = RuleBasedExtractor::new();
        assert!(extractor
            .parse_query(&context("rank the headlines"))
            .has_intent(QueryIntent::Score));

        let mut with_threshold = context("headlines");
        with_threshold.score_threshold = Some(0.7);
        assert!(extractor
            .parse_query(&with_threshold)
            .has_intent(QueryIntent::Score));
    }

    #[test]
    fn plain_query_still_parses_with_search_intent() {
        let extractor = RuleBasedExtractor::new();
        let parsed = extractor.parse_query(&context("storm damage downtown"));
        assert!(parsed.has_intent(QueryIntent::Search));
        assert_eq!(parsed.search_query(), Some("storm damage downtown"));
        assert!(!parsed.fallback_used());
    }

    #[test]
    fn search_query_widened_with_detections() {
        let extractor = RuleBasedExtractor::new();
        let parsed = extractor.parse_query(&context("bbc technology coverage"));
        assert_eq!(
            parsed.search_query(),
            Some("bbc technology coverage technology BBC")
        );
    }

    #[test]
    fn context_geo_carried_into_filters() {
        let extractor = RuleBasedExtractor::new();
        let mut ctx = context("anything around here");
        ctx.latitude = Some(40.7);
        ctx.longitude = Some(-74.0);
        ctx.radius_km = Some(15.0);
        let parsed = extractor.parse_query(&ctx);
        assert_eq!(parsed.filters().latitude, Some(40.7));
        assert_eq!(parsed.filters().radius_km, Some(15.0));
    }

    #[test]
    fn entities_are_capitalized_runs() {
        let entities = extract_entities("Tesla opens Berlin factory near New York");
        assert_eq!(entities, vec!["Tesla", "Berlin", "New York"]);
    }

    #[test]
    fn enrichment_summarizes_and_explains() {
        let extractor = RuleBasedExtractor::new();
        let article = article();
        let request = EnrichmentRequest {
            article: &article,
            user_query: Some("tesla news"),
            user_latitude: Some(52.5),
            user_longitude: Some(13.4),
            match_reason: Some("category match"),
        };
        let enrichment = extractor.generate_enrichment(&request);
        let summary = enrichment.summary.unwrap();
        assert!(summary.ends_with(" from Reuters"));
        assert!(enrichment.key_entities.contains(&"Tesla".to_string()));
        let why = enrichment.why_relevant.unwrap();
        assert!(why.starts_with("Matched by category match"));
        assert!(why.contains("Geographically relevant"));
    }

    #[test]
    fn long_description_truncated_on_char_boundary() {
        let long = "é".repeat(300);
        let summary = build_summary(Some(&long), "title", None).unwrap();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 220);
    }
}
