//! Intent-gated retrieval strategies, run in priority order.

use newsflow_core::geo::distance_km;
use newsflow_core::score::RetrievedArticle;
use newsflow_core::traits::ArticleStore;
use newsflow_core::{NewsResult, QueryIntent};

use crate::context::RetrievalContext;

/// One way of pulling candidate articles out of the store.
///
/// Strategies see the over-fetched limit, not the caller's; the orchestrator
/// owns deduplication and truncation.
pub trait RetrievalStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower runs earlier; earlier strategies win dedup ties.
    fn priority(&self) -> u8;

    fn supports(&self, context: &RetrievalContext<'_>) -> bool;

    fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>>;
}

/// All built-in strategies, sorted by priority.
pub fn default_registry() -> Vec<Box<dyn RetrievalStrategy>> {
    let mut strategies: Vec<Box<dyn RetrievalStrategy>> = vec![
        Box::new(CategoryStrategy),
        Box::new(SourceStrategy),
        Box::new(ScoreStrategy),
        Box::new(NearbyStrategy),
        Box::new(SearchStrategy),
    ];
    strategies.sort_by_key(|s| s.priority());
    strategies
}

fn relevance_retrieved(
    store: &dyn ArticleStore,
    context: &RetrievalContext<'_>,
    limit: usize,
    strategy: &'static str,
) -> NewsResult<Vec<RetrievedArticle>> {
    let filter = context.apply_bounding_box(context.base_filter());
    let articles = store.find_by_filter(&filter, limit)?;
    Ok(articles
        .into_iter()
        .map(|article| {
            let primary = article.relevance_or_zero();
            RetrievedArticle::new(article, strategy, primary)
        })
        .collect())
}

/// Articles in the category the parse extracted.
pub struct CategoryStrategy;

impl RetrievalStrategy for CategoryStrategy {
    fn name(&self) -> &'static str {
        "category"
    }

    fn priority(&self) -> u8 {
        10
    }

    fn supports(&self, context: &RetrievalContext<'_>) -> bool {
        context.parsed.has_intent(QueryIntent::Category)
            && context.parsed.filters().category.is_some()
    }

    fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>> {
        relevance_retrieved(store, context, limit, self.name())
    }
}

/// Articles from the source the parse extracted.
pub struct SourceStrategy;

impl RetrievalStrategy for SourceStrategy {
    fn name(&self) -> &'static str {
        "source"
    }

    fn priority(&self) -> u8 {
        20
    }

    fn supports(&self, context: &RetrievalContext<'_>) -> bool {
        context.parsed.has_intent(QueryIntent::Source) && context.parsed.filters().source.is_some()
    }

    fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>> {
        relevance_retrieved(store, context, limit, self.name())
    }
}

/// Articles above the requested relevance threshold.
pub struct ScoreStrategy;

impl RetrievalStrategy for ScoreStrategy {
    fn name(&self) -> &'static str {
        "score"
    }

    fn priority(&self) -> u8 {
        30
    }

    fn supports(&self, context: &RetrievalContext<'_>) -> bool {
        context.parsed.has_intent(QueryIntent::Score)
            && context.parsed.filters().score_threshold.is_some()
    }

    fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>> {
        relevance_retrieved(store, context, limit, self.name())
    }
}

/// Articles inside the geo bounding box, scored by closeness.
pub struct NearbyStrategy;

impl RetrievalStrategy for NearbyStrategy {
    fn name(&self) -> &'static str {
        "nearby"
    }

    fn priority(&self) -> u8 {
        40
    }

    fn supports(&self, context: &RetrievalContext<'_>) -> bool {
        context.parsed.has_intent(QueryIntent::Nearby)
            && context.resolve_latitude().is_some()
            && context.resolve_longitude().is_some()
    }

    fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>> {
        let (Some(lat), Some(lon)) = (context.resolve_latitude(), context.resolve_longitude())
        else {
            return Ok(Vec::new());
        };
        let radius_km = context.resolve_radius_km();
        let filter = context.apply_bounding_box(context.base_filter());
        let articles = store.find_by_filter(&filter, limit)?;
        Ok(articles
            .into_iter()
            .map(|article| {
                let distance = distance_km(lat, lon, article.latitude, article.longitude);
                let proximity = (1.0 - (distance / radius_km).min(1.0)).max(0.0);
                RetrievedArticle::new(article, self.name(), proximity)
            })
            .collect())
    }
}

/// Free-text search; the universal fallback every query supports.
pub struct SearchStrategy;

impl RetrievalStrategy for SearchStrategy {
    fn name(&self) -> &'static str {
        "search"
    }

    fn priority(&self) -> u8 {
        50
    }

    fn supports(&self, context: &RetrievalContext<'_>) -> bool {
        context.parsed.has_intent(QueryIntent::Search) || context.parsed.search_query().is_some()
    }

    fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>> {
        // Prefer the parsed search text, fall back to the raw query.
        let search = context
            .parsed
            .search_query()
            .unwrap_or(context.request.query.as_str());
        if search.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut filter = context.apply_bounding_box(context.base_filter());
        filter.search_text = Some(search.to_string());
        let articles = store.find_by_filter(&filter, limit)?;
        Ok(articles
            .into_iter()
            .map(|article| {
                let primary = article.relevance_or_zero();
                RetrievedArticle::new(article, self.name(), primary)
            })
            .collect())
    }
}
