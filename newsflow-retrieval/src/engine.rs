//! End-to-end query pipeline.

use tracing::{debug, info};

use newsflow_core::config::NewsConfig;
use newsflow_core::query::{ParsedQuery, QueryFilters};
use newsflow_core::request::QueryRequest;
use newsflow_core::response::{ArticleResult, QueryMetadata, QueryResponse};
use newsflow_core::traits::{ArticleStore, LanguageModel};
use newsflow_core::{NewsResult, QueryIntent};

use newsflow_query::{EnrichmentAssembler, QueryParser};

use crate::context::RetrievalContext;
use crate::orchestrator::RetrievalOrchestrator;
use crate::ranking::RankingEngine;
use crate::strategies::default_registry;

/// Validate, understand, retrieve, rank, enrich, assemble.
pub struct QueryEngine<'a> {
    store: &'a dyn ArticleStore,
    parser: QueryParser<'a>,
    assembler: EnrichmentAssembler<'a>,
    orchestrator: RetrievalOrchestrator,
    ranking: RankingEngine,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        store: &'a dyn ArticleStore,
        model: &'a dyn LanguageModel,
        config: &NewsConfig,
    ) -> Self {
        Self {
            store,
            parser: QueryParser::new(model),
            assembler: EnrichmentAssembler::new(model, &config.enrichment),
            orchestrator: RetrievalOrchestrator::new(default_registry()),
            ranking: RankingEngine::new(config.ranking.clone()),
        }
    }

    pub fn query(&self, request: &QueryRequest) -> NewsResult<QueryResponse> {
        request.validate()?;
        let parsed = self.parser.parse(&request.understanding_context());
        self.query_with_parsed(request, parsed)
    }

    /// Run the pipeline on an externally supplied parse. Also the tail of
    /// [`QueryEngine::query`].
    pub fn query_with_parsed(
        &self,
        request: &QueryRequest,
        parsed: ParsedQuery,
    ) -> NewsResult<QueryResponse> {
        request.validate()?;
        let adjusted = merge_request_filters(parsed, request);
        let context = RetrievalContext::new(request, &adjusted);
        let limit = request.resolved_limit();

        let retrieved = self.orchestrator.retrieve(self.store, &context, limit)?;
        debug!(candidates = retrieved.len(), limit, "retrieval complete");
        if retrieved.is_empty() {
            return Ok(QueryResponse {
                metadata: QueryMetadata::from_parsed(&request.query, &adjusted),
                articles: Vec::new(),
                total_found: 0,
            });
        }

        let scored = self.ranking.score(retrieved, &context);
        let total_found = scored.len();
        let top: Vec<_> = scored.into_iter().take(limit).collect();

        let filters = adjusted.filters();
        let enriched = self.assembler.enrich_top(
            top,
            Some(request.query.as_str()),
            filters.latitude,
            filters.longitude,
        );
        let articles: Vec<ArticleResult> = enriched
            .into_iter()
            .map(|(score, enrichment)| ArticleResult::from_score(score, enrichment))
            .collect();

        info!(
            query = %request.query,
            returned = articles.len(),
            total_found,
            fallback = adjusted.fallback_used(),
            "query answered"
        );
        Ok(QueryResponse {
            metadata: QueryMetadata::from_parsed(&request.query, &adjusted),
            articles,
            total_found,
        })
    }
}

/// Fill parse filters from the request where the parse is silent. Intents
/// are never touched: the parse alone decides which strategies run.
fn merge_request_filters(parsed: ParsedQuery, request: &QueryRequest) -> ParsedQuery {
    let filters = parsed.filters();
    let score_threshold = filters.score_threshold.or(request.score_threshold);
    let radius_km = filters.radius_km.or(request.radius_km).or_else(|| {
        parsed
            .has_intent(QueryIntent::Nearby)
            .then(|| request.resolved_radius_km())
    });
    let latitude = filters
        .latitude
        .or_else(|| request.user_location.map(|l| l.latitude));
    let longitude = filters
        .longitude
        .or_else(|| request.user_location.map(|l| l.longitude));

    let merged = QueryFilters {
        category: filters.category.clone(),
        source: filters.source.clone(),
        score_threshold,
        radius_km,
        latitude,
        longitude,
        date_from: filters.date_from,
        date_to: filters.date_to,
    };
    parsed.with_filters(merged)
}
