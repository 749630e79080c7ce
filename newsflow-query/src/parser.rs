//! Cached query understanding with rule-based fallback.

use moka::sync::Cache;
use tracing::{debug, warn};

use newsflow_core::constants;
use newsflow_core::query::{ParsedQuery, QueryContext};
use newsflow_core::traits::LanguageModel;

use crate::rules::RuleBasedExtractor;
use crate::schema;

/// Turns raw queries into [`ParsedQuery`] values.
///
/// The language model is the primary path; a disabled model, a failed call,
/// or a malformed payload all degrade to the rule-based extractor with the
/// fallback flag raised. Results are cached per (query, location).
pub struct QueryParser<'a> {
    model: &'a dyn LanguageModel,
    rules: RuleBasedExtractor,
    cache: Cache<String, ParsedQuery>,
}

impl<'a> QueryParser<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self {
            model,
            rules: RuleBasedExtractor::new(),
            cache: Cache::builder()
                .max_capacity(constants::DEFAULT_QUERY_CACHE_CAPACITY)
                .build(),
        }
    }

    pub fn parse(&self, context: &QueryContext) -> ParsedQuery {
        let key = cache_key(context);
        if let Some(hit) = self.cache.get(&key) {
            debug!(query = %context.query, "query understanding cache hit");
            return hit;
        }
        let parsed = self.parse_uncached(context);
        self.cache.insert(key, parsed.clone());
        parsed
    }

    fn parse_uncached(&self, context: &QueryContext) -> ParsedQuery {
        if !self.model.enabled() {
            debug!("language model disabled, using rule-based parser");
            return self.rules.parse_query(context).with_fallback();
        }
        match self
            .model
            .complete_query(context)
            .and_then(schema::decode_query)
        {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, query = %context.query, "model query parsing failed, falling back");
                self.rules.parse_query(context).with_fallback()
            }
        }
    }
}

fn cache_key(context: &QueryContext) -> String {
    format!(
        "{}:{}:{}",
        context.query,
        context
            .latitude
            .map(|v| v.to_string())
            .unwrap_or_default(),
        context
            .longitude
            .map(|v| v.to_string())
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsflow_core::enrichment::EnrichmentRequest;
    use newsflow_core::{NewsError, NewsResult, QueryIntent};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingModel {
        calls: AtomicUsize,
        response: NewsResult<Value>,
    }

    impl CountingModel {
        fn returning(response: NewsResult<Value>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response,
            }
        }
    }

    impl LanguageModel for CountingModel {
        fn complete_query(&self, _context: &QueryContext) -> NewsResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err(_) => Err(NewsError::Capability("boom".to_string())),
            }
        }

        fn complete_enrichment(&self, _request: &EnrichmentRequest<'_>) -> NewsResult<Value> {
            Err(NewsError::CapabilityDisabled)
        }
    }

    struct DisabledModel;

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

    fn context(query: &str) -> QueryContext {
        QueryContext {
            query: query.to_string(),
            latitude: None,
            longitude: None,
            radius_km: None,
            score_threshold: None,
        }
    }

    #[test]
    fn model_payload_wins_over_rules() {
        let model = CountingModel::returning(Ok(json!({
            "intent": "category",
            "filters": {"category": "science"}
        })));
        let parser = QueryParser::new(&model);
        let parsed = parser.parse(&context("science breakthroughs"));
        assert!(parsed.has_intent(QueryIntent::Category));
        assert_eq!(parsed.filters().category.as_deref(), Some("science"));
        assert!(!parsed.fallback_used());
    }

    #[test]
    fn repeated_query_served_from_cache() {
        let model = CountingModel::returning(Ok(json!({"intent": "search"})));
        let parser = QueryParser::new(&model);
        parser.parse(&context("tech"));
        parser.parse(&context("tech"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn model_failure_falls_back_with_flag() {
        let model = CountingModel::returning(Err(NewsError::Capability("boom".to_string())));
        let parser = QueryParser::new(&model);
        let parsed = parser.parse(&context("technology news"));
        assert!(parsed.fallback_used());
        assert!(parsed.has_intent(QueryIntent::Category));
    }

    #[test]
    fn malformed_payload_falls_back_with_flag() {
        let model = CountingModel::returning(Ok(json!("not an object")));
        let parser = QueryParser::new(&model);
        let parsed = parser.parse(&context("sports scores"));
        assert!(parsed.fallback_used());
        assert!(parsed.has_intent(QueryIntent::Search));
    }

    #[test]
    fn disabled_model_never_called() {
        let parser = QueryParser::new(&DisabledModel);
        let parsed = parser.parse(&context("business update"));
        assert!(parsed.fallback_used());
        assert!(parsed.has_intent(QueryIntent::Category));
    }

    #[test]
    fn location_is_part_of_the_cache_key() {
        let model = CountingModel::returning(Ok(json!({"intent": "search"})));
        let parser = QueryParser::new(&model);
        let mut here = context("tech");
        here.latitude = Some(40.7);
        here.longitude = Some(-74.0);
        parser.parse(&context("tech"));
        parser.parse(&here);
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }
}
