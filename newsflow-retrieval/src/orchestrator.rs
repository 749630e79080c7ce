//! Runs the strategy registry and merges candidates.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use newsflow_core::constants::OVERFETCH_FACTOR;
use newsflow_core::score::RetrievedArticle;
use newsflow_core::traits::ArticleStore;
use newsflow_core::NewsResult;

use crate::context::RetrievalContext;
use crate::strategies::RetrievalStrategy;

/// Fans one query out across the supporting strategies.
///
/// First strategy to surface an article keeps it, so its primary score and
/// strategy name reflect the highest-priority match. Strategies over-fetch
/// so post-merge ranking has enough candidates to reorder.
pub struct RetrievalOrchestrator {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
}

impl RetrievalOrchestrator {
    pub fn new(strategies: Vec<Box<dyn RetrievalStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn retrieve(
        &self,
        store: &dyn ArticleStore,
        context: &RetrievalContext<'_>,
        limit: usize,
    ) -> NewsResult<Vec<RetrievedArticle>> {
        let fetch_limit = limit * OVERFETCH_FACTOR;
        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut merged: Vec<RetrievedArticle> = Vec::new();

        for strategy in &self.strategies {
            if !strategy.supports(context) {
                continue;
            }
            let candidates = strategy.retrieve(store, context, fetch_limit)?;
            debug!(
                strategy = strategy.name(),
                candidates = candidates.len(),
                "strategy retrieved"
            );
            merge_unseen(&mut merged, &mut seen, candidates);
        }

        // Nothing matched the intent-gated strategies: force a plain search
        // so the query never comes back empty for retrieval reasons alone.
        if merged.is_empty() {
            if let Some(search) = self.strategies.iter().find(|s| s.name() == "search") {
                debug!("no candidates from gated strategies, forcing search");
                let candidates = search.retrieve(store, context, fetch_limit)?;
                merge_unseen(&mut merged, &mut seen, candidates);
            }
        }

        merged.truncate(fetch_limit);
        Ok(merged)
    }
}

fn merge_unseen(
    merged: &mut Vec<RetrievedArticle>,
    seen: &mut HashSet<Uuid>,
    candidates: Vec<RetrievedArticle>,
) {
    for candidate in candidates {
        if seen.insert(candidate.article.id) {
            merged.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use newsflow_core::query::{ParsedQuery, QueryFilters};
    use newsflow_core::request::QueryRequest;
    use newsflow_core::{NewsArticle, QueryIntent};
    use std::collections::BTreeSet;

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            url: None,
            publication_date: Some(Utc::now()),
            source_name: None,
            relevance_score: Some(0.5),
            latitude: 0.0,
            longitude: 0.0,
            categories: Vec::new(),
        }
    }

    struct FixedStrategy {
        name: &'static str,
        priority: u8,
        supported: bool,
        articles: Vec<NewsArticle>,
    }

    impl RetrievalStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn supports(&self, _context: &RetrievalContext<'_>) -> bool {
            self.supported
        }

        fn retrieve(
            &self,
            _store: &dyn ArticleStore,
            _context: &RetrievalContext<'_>,
            limit: usize,
        ) -> NewsResult<Vec<RetrievedArticle>> {
            Ok(self
                .articles
                .iter()
                .take(limit)
                .map(|a| RetrievedArticle::new(a.clone(), self.name, 0.5))
                .collect())
        }
    }

    struct EmptyStore;

    impl ArticleStore for EmptyStore {
        fn find_by_id(&self, _id: Uuid) -> NewsResult<Option<NewsArticle>> {
            Ok(None)
        }

        fn find_by_filter(
            &self,
            _filter: &newsflow_core::traits::ArticleFilter,
            _limit: usize,
        ) -> NewsResult<Vec<NewsArticle>> {
            Ok(Vec::new())
        }

        fn count(&self) -> NewsResult<usize> {
            Ok(0)
        }

        fn save_all(&self, _articles: Vec<NewsArticle>) -> NewsResult<()> {
            Ok(())
        }
    }

    fn context_parts() -> (QueryRequest, ParsedQuery) {
        let request = QueryRequest::new("query");
        let parsed = ParsedQuery::new(
            Vec::new(),
            Vec::new(),
            BTreeSet::from([QueryIntent::Search]),
            QueryFilters::default(),
            Some("query".to_string()),
            false,
        );
        (request, parsed)
    }

    #[test]
    fn first_strategy_wins_duplicates() {
        let shared = article("shared");
        let orchestrator = RetrievalOrchestrator::new(vec![
            Box::new(FixedStrategy {
                name: "category",
                priority: 10,
                supported: true,
                articles: vec![shared.clone(), article("cat only")],
            }),
            Box::new(FixedStrategy {
                name: "search",
                priority: 50,
                supported: true,
                articles: vec![shared.clone(), article("search only")],
            }),
        ]);
        let (request, parsed) = context_parts();
        let context = RetrievalContext::new(&request, &parsed);
        let merged = orchestrator.retrieve(&EmptyStore, &context, 10).unwrap();
        assert_eq!(merged.len(), 3);
        let kept = merged.iter().find(|c| c.article.id == shared.id).unwrap();
        assert_eq!(kept.strategy, "category");
    }

    #[test]
    fn merged_id_set_is_stable_under_strategy_order() {
        let shared = article("shared");
        let only_a = article("only a");
        let only_b = article("only b");
        let strategy_a = || FixedStrategy {
            name: "category",
            priority: 10,
            supported: true,
            articles: vec![shared.clone(), only_a.clone()],
        };
        let strategy_b = || FixedStrategy {
            name: "search",
            priority: 50,
            supported: true,
            articles: vec![shared.clone(), only_b.clone()],
        };
        let (request, parsed) = context_parts();
        let context = RetrievalContext::new(&request, &parsed);

        let forward = RetrievalOrchestrator::new(vec![Box::new(strategy_a()), Box::new(strategy_b())])
            .retrieve(&EmptyStore, &context, 10)
            .unwrap();
        let reversed = RetrievalOrchestrator::new(vec![Box::new(strategy_b()), Box::new(strategy_a())])
            .retrieve(&EmptyStore, &context, 10)
            .unwrap();

        let mut forward_ids: Vec<Uuid> = forward.iter().map(|c| c.article.id).collect();
        let mut reversed_ids: Vec<Uuid> = reversed.iter().map(|c| c.article.id).collect();
        forward_ids.sort();
        reversed_ids.sort();
        assert_eq!(forward_ids, reversed_ids);

        // The winning tag for the shared article follows execution order.
        let tag = |merged: &[RetrievedArticle]| {
            merged
                .iter()
                .find(|c| c.article.id == shared.id)
                .unwrap()
                .strategy
        };
        assert_eq!(tag(&forward), "category");
        assert_eq!(tag(&reversed), "search");
    }

    #[test]
    fn unsupported_strategies_are_skipped() {
        let orchestrator = RetrievalOrchestrator::new(vec![
            Box::new(FixedStrategy {
                name: "category",
                priority: 10,
                supported: false,
                articles: vec![article("hidden")],
            }),
            Box::new(FixedStrategy {
                name: "search",
                priority: 50,
                supported: true,
                articles: vec![article("visible")],
            }),
        ]);
        let (request, parsed) = context_parts();
        let context = RetrievalContext::new(&request, &parsed);
        let merged = orchestrator.retrieve(&EmptyStore, &context, 10).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].article.title, "visible");
    }

    #[test]
    fn empty_merge_forces_the_search_strategy() {
        // Search reports unsupported, but still runs as the forced fallback.
        let orchestrator = RetrievalOrchestrator::new(vec![Box::new(FixedStrategy {
            name: "search",
            priority: 50,
            supported: false,
            articles: vec![article("forced")],
        })]);
        let (request, parsed) = context_parts();
        let context = RetrievalContext::new(&request, &parsed);
        let merged = orchestrator.retrieve(&EmptyStore, &context, 10).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].article.title, "forced");
    }

    #[test]
    fn merged_result_truncated_to_overfetch_limit() {
        let articles: Vec<NewsArticle> = (0..40).map(|i| article(&format!("a{i}"))).collect();
        let orchestrator = RetrievalOrchestrator::new(vec![Box::new(FixedStrategy {
            name: "search",
            priority: 50,
            supported: true,
            articles,
        })]);
        let (request, parsed) = context_parts();
        let context = RetrievalContext::new(&request, &parsed);
        let merged = orchestrator.retrieve(&EmptyStore, &context, 10).unwrap();
        assert_eq!(merged.len(), 30);
    }
}
