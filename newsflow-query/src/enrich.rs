//! Model-backed article enrichment with a per-article TTL cache.

use moka::sync::Cache;
use tracing::warn;
use uuid::Uuid;

use newsflow_core::config::EnrichmentConfig;
use newsflow_core::enrichment::{ArticleEnrichment, EnrichmentRequest};
use newsflow_core::score::ArticleScore;
use newsflow_core::traits::LanguageModel;

use crate::rules::RuleBasedExtractor;
use crate::schema;

/// Produces enrichment for ranked articles, model-first.
///
/// Model output is merged over the rule-based result so a payload that only
/// fills some fields still yields a complete enrichment. Only the top N
/// ranked articles are enriched; results are cached per article id with a
/// TTL so a hot article is not re-summarized on every query.
pub struct EnrichmentAssembler<'a> {
    model: &'a dyn LanguageModel,
    rules: RuleBasedExtractor,
    top_n: usize,
    cache: Cache<Uuid, ArticleEnrichment>,
}

impl<'a> EnrichmentAssembler<'a> {
    pub fn new(model: &'a dyn LanguageModel, config: &EnrichmentConfig) -> Self {
        Self {
            model,
            rules: RuleBasedExtractor::new(),
            top_n: config.top_n,
            cache: Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(config.cache_ttl())
                .build(),
        }
    }

    /// Enrich one article. Never fails; the rule-based extractor is the floor.
    pub fn enrich(&self, request: &EnrichmentRequest<'_>) -> ArticleEnrichment {
        if let Some(hit) = self.cache.get(&request.article.id) {
            return hit;
        }
        let enrichment = self.enrich_uncached(request);
        if !enrichment.is_empty() {
            self.cache.insert(request.article.id, enrichment.clone());
        }
        enrichment
    }

    /// Enrichment for the top N of a ranked list; the rest get `None`.
    pub fn enrich_top(
        &self,
        ranked: Vec<ArticleScore>,
        user_query: Option<&str>,
        user_latitude: Option<f64>,
        user_longitude: Option<f64>,
    ) -> Vec<(ArticleScore, Option<ArticleEnrichment>)> {
        ranked
            .into_iter()
            .enumerate()
            .map(|(index, score)| {
                let enrichment = (index < self.top_n).then(|| {
                    self.enrich(&EnrichmentRequest {
                        article: &score.article,
                        user_query,
                        user_latitude,
                        user_longitude,
                        match_reason: Some(score.match_reason.as_str()),
                    })
                });
                (score, enrichment)
            })
            .collect()
    }

    fn enrich_uncached(&self, request: &EnrichmentRequest<'_>) -> ArticleEnrichment {
        if !self.model.enabled() {
            return self.rules.generate_enrichment(request);
        }
        match self
            .model
            .complete_enrichment(request)
            .and_then(schema::decode_enrichment)
        {
            Ok(enrichment) if !enrichment.is_empty() => {
                enrichment.merge_missing(self.rules.generate_enrichment(request))
            }
            Ok(_) => self.rules.generate_enrichment(request),
            Err(error) => {
                warn!(%error, article = %request.article.id, "model enrichment failed, using fallback");
                self.rules.generate_enrichment(request)
            }
        }
    }
}
