//! Event recording and feed assembly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use newsflow_core::config::NewsConfig;
use newsflow_core::constants;
use newsflow_core::enrichment::EnrichmentRequest;
use newsflow_core::geo::{distance_km, GeoBucketer};
use newsflow_core::response::{TrendingArticle, TrendingMetadata, TrendingResponse};
use newsflow_core::traits::{ArticleStore, LanguageModel, TrendStore};
use newsflow_core::trend::{TrendAggregate, TrendEvent};
use newsflow_core::{NewsArticle, NewsError, NewsResult};

use newsflow_query::EnrichmentAssembler;

use crate::cache::{FeedCache, FeedKey};

/// Records interaction events and serves trending feeds.
pub struct TrendingEngine<'a> {
    articles: &'a dyn ArticleStore,
    trends: &'a dyn TrendStore,
    assembler: EnrichmentAssembler<'a>,
    bucketer: GeoBucketer,
    lambda: f64,
    default_radius_km: f64,
    default_limit: usize,
    enrichment_top_n: usize,
    cache: FeedCache,
}

impl<'a> TrendingEngine<'a> {
    pub fn new(
        articles: &'a dyn ArticleStore,
        trends: &'a dyn TrendStore,
        model: &'a dyn LanguageModel,
        config: &NewsConfig,
    ) -> Self {
        Self {
            articles,
            trends,
            assembler: EnrichmentAssembler::new(model, &config.enrichment),
            bucketer: GeoBucketer::new(config.trending.bucket_size_degrees),
            lambda: config.trending.lambda(),
            default_radius_km: config.trending.default_radius_km,
            default_limit: config.trending.default_limit,
            enrichment_top_n: config.enrichment.top_n,
            cache: FeedCache::new(),
        }
    }

    /// Record one interaction event at the current time.
    pub fn record_event(&self, event: &TrendEvent) -> NewsResult<()> {
        self.record_event_at(event, Utc::now())
    }

    /// Record one interaction event. The event's own timestamp wins over
    /// `now` when present; its location wins over the article's coordinates.
    pub fn record_event_at(&self, event: &TrendEvent, now: DateTime<Utc>) -> NewsResult<()> {
        if let Some(location) = &event.location {
            location.validate()?;
        }
        let article = self
            .articles
            .find_by_id(event.article_id)?
            .ok_or(NewsError::ArticleNotFound(event.article_id))?;

        let occurred_at = event.occurred_at.unwrap_or(now);
        let (latitude, longitude) = match &event.location {
            Some(location) => (location.latitude, location.longitude),
            None => (article.latitude, article.longitude),
        };

        let bucket = self.bucketer.bucket_id(latitude, longitude);
        self.trends.apply_event(
            bucket,
            article.id,
            event.event_type.weight(),
            occurred_at,
            self.lambda,
        )?;

        debug!(
            article = %article.id,
            bucket = %bucket,
            event = ?event.event_type,
            "trend event recorded"
        );
        // Any write may change any nearby feed; drop them all.
        self.cache.invalidate_all();
        Ok(())
    }

    /// Trending feed around a point, evaluated at the current time.
    pub fn trending_feed(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
        limit: Option<usize>,
    ) -> NewsResult<TrendingResponse> {
        self.trending_feed_at(latitude, longitude, radius_km, limit, Utc::now())
    }

    pub fn trending_feed_at(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> NewsResult<TrendingResponse> {
        validate_coordinates(latitude, longitude)?;
        let radius = radius_km
            .map(|r| {
                r.clamp(
                    constants::MIN_TRENDING_RADIUS_KM,
                    constants::MAX_TRENDING_RADIUS_KM,
                )
            })
            .unwrap_or(self.default_radius_km);
        let limit = limit
            .map(|l| l.clamp(1, constants::MAX_TRENDING_LIMIT))
            .unwrap_or(self.default_limit);

        let primary_bucket = self.bucketer.bucket_id(latitude, longitude);
        let key = FeedKey::new(primary_bucket, radius, limit);
        if let Some(cached) = self.cache.get(&key) {
            debug!(bucket = %primary_bucket, "trending feed cache hit");
            return Ok(TrendingResponse {
                metadata: TrendingMetadata {
                    latitude,
                    longitude,
                    radius_km: radius,
                    limit,
                    cache_hit: true,
                    bucket_id: cached.metadata.bucket_id.clone(),
                },
                articles: cached.articles,
            });
        }

        let buckets = self.bucketer.nearby_buckets(latitude, longitude, radius);
        let aggregates = self.trends.find_in_buckets(&buckets)?;
        let mut ranked = self.rank_aggregates(aggregates, latitude, longitude, now)?;
        ranked.truncate(limit);

        let articles = self.enrich_feed(ranked, latitude, longitude);
        let response = TrendingResponse {
            metadata: TrendingMetadata {
                latitude,
                longitude,
                radius_km: radius,
                limit,
                cache_hit: false,
                bucket_id: primary_bucket.to_string(),
            },
            articles,
        };
        // Empty feeds are cached too; an empty area stays empty until an
        // event invalidates.
        self.cache.put(key, response.clone());
        info!(
            bucket = %primary_bucket,
            returned = response.articles.len(),
            radius,
            "trending feed built"
        );
        Ok(response)
    }

    /// Best decayed score per article across the scanned buckets, positive
    /// scores only, ordered descending with article id as tie-break.
    fn rank_aggregates(
        &self,
        aggregates: Vec<TrendAggregate>,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) -> NewsResult<Vec<(NewsArticle, f64, f64)>> {
        let mut best: HashMap<Uuid, f64> = HashMap::new();
        for aggregate in aggregates {
            let decayed = aggregate.decayed_score(now, self.lambda);
            let entry = best.entry(aggregate.article_id).or_insert(0.0);
            if decayed > *entry {
                *entry = decayed;
            }
        }

        let mut ranked: Vec<(NewsArticle, f64, f64)> = Vec::with_capacity(best.len());
        for (article_id, score) in best {
            if score <= 0.0 {
                continue;
            }
            // Aggregates can outlive their article; skip orphans.
            let Some(article) = self.articles.find_by_id(article_id)? else {
                continue;
            };
            let distance = distance_km(latitude, longitude, article.latitude, article.longitude);
            ranked.push((article, score, distance));
        }
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        Ok(ranked)
    }

    fn enrich_feed(
        &self,
        ranked: Vec<(NewsArticle, f64, f64)>,
        latitude: f64,
        longitude: f64,
    ) -> Vec<TrendingArticle> {
        ranked
            .into_iter()
            .enumerate()
            .map(|(index, (article, trend_score, distance))| {
                let enrichment = (index < self.enrichment_top_n).then(|| {
                    self.assembler.enrich(&EnrichmentRequest {
                        article: &article,
                        user_query: None,
                        user_latitude: Some(latitude),
                        user_longitude: Some(longitude),
                        match_reason: Some("trending"),
                    })
                });
                TrendingArticle {
                    article,
                    trend_score,
                    distance_km: Some(distance),
                    enrichment: enrichment.filter(|e| !e.is_empty()),
                }
            })
            .collect()
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> NewsResult<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(NewsError::Validation(format!(
            "latitude out of range: {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(NewsError::Validation(format!(
            "longitude out of range: {longitude}"
        )));
    }
    Ok(())
}
