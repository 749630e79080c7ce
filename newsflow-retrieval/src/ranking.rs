//! Weighted multi-factor ranking of retrieved candidates.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use newsflow_core::config::RankingConfig;
use newsflow_core::geo::distance_km;
use newsflow_core::score::{ArticleScore, RetrievedArticle};
use newsflow_core::NewsArticle;

use crate::context::RetrievalContext;

/// Scores candidates on relevance, recency, semantic overlap, and proximity.
///
/// Ordering is deterministic: final score descending, ties broken by article
/// id, so identical corpora always rank identically.
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        candidates: Vec<RetrievedArticle>,
        context: &RetrievalContext<'_>,
    ) -> Vec<ArticleScore> {
        self.score_at(candidates, context, Utc::now())
    }

    pub fn score_at(
        &self,
        candidates: Vec<RetrievedArticle>,
        context: &RetrievalContext<'_>,
        now: DateTime<Utc>,
    ) -> Vec<ArticleScore> {
        let query_tokens = self.query_tokens(context);
        let mut scored: Vec<ArticleScore> = candidates
            .into_iter()
            .map(|candidate| self.score_candidate(candidate, context, &query_tokens, now))
            .collect();
        scored.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.article.id.cmp(&b.article.id))
        });
        scored
    }

    fn score_candidate(
        &self,
        candidate: RetrievedArticle,
        context: &RetrievalContext<'_>,
        query_tokens: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> ArticleScore {
        let article = &candidate.article;

        let relevance = article.relevance_or_zero();
        let recency = self.recency_contribution(article.publication_date, now);
        let semantic = semantic_contribution(query_tokens, article);
        let proximity = self.proximity_contribution(&candidate, context);

        let final_score = self.config.relevance_weight * relevance
            + self.config.recency_weight * recency
            + self.config.semantic_weight * semantic
            + self.config.proximity_weight * proximity;

        let distance_km = match (context.resolve_latitude(), context.resolve_longitude()) {
            (Some(lat), Some(lon)) => {
                Some(distance_km(lat, lon, article.latitude, article.longitude))
            }
            _ => None,
        };

        let match_reason = match_reason(candidate.strategy);

        ArticleScore {
            article: candidate.article,
            final_score,
            distance_km,
            match_reason,
            relevance_contribution: relevance,
            recency_contribution: recency,
            semantic_contribution: semantic,
            proximity_contribution: proximity,
        }
    }

    /// Exponential decay with the configured half-life. Undated articles
    /// contribute nothing; future-dated ones are treated as brand new.
    fn recency_contribution(
        &self,
        publication_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> f64 {
        let Some(published) = publication_date else {
            return 0.0;
        };
        let days = (now - published).num_hours() as f64 / 24.0;
        if days <= 0.0 {
            return 1.0;
        }
        let lambda = std::f64::consts::LN_2 / self.config.recency_half_life_days;
        (-lambda * days).exp()
    }

    /// Proximity only counts for articles the nearby strategy surfaced, and
    /// only when the caller actually supplied a location.
    fn proximity_contribution(
        &self,
        candidate: &RetrievedArticle,
        context: &RetrievalContext<'_>,
    ) -> f64 {
        if context.request.user_location.is_none() || candidate.strategy != "nearby" {
            return 0.0;
        }
        candidate.primary_score.clamp(0.0, 1.0)
    }

    fn query_tokens(&self, context: &RetrievalContext<'_>) -> HashSet<String> {
        let mut tokens = tokenize(&context.request.query);
        if let Some(search) = context.parsed.search_query() {
            tokens.extend(tokenize(search));
        }
        tokens
    }
}

/// Jaccard overlap between query tokens and title+description tokens.
fn semantic_contribution(query_tokens: &HashSet<String>, article: &NewsArticle) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let mut article_tokens = tokenize(&article.title);
    if let Some(description) = &article.description {
        article_tokens.extend(tokenize(description));
    }
    if article_tokens.is_empty() {
        return 0.0;
    }
    let intersection = article_tokens.intersection(query_tokens).count();
    let union = article_tokens.union(query_tokens).count();
    intersection as f64 / union as f64
}

/// Lowercase alphanumeric tokens longer than two characters.
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() > 2)
        .map(str::to_string)
        .collect()
}

/// The strategy that surfaced the article names the match. Intent-gated
/// strategies only run for their own intent, so this is also the intent that
/// was served.
fn match_reason(strategy: &'static str) -> String {
    strategy.to_string()
}
