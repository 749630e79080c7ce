//! Runtime configuration with serde defaults backed by [`crate::constants`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{NewsError, NewsResult};

/// Ranking factor weights and the recency half-life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub relevance_weight: f64,
    pub recency_weight: f64,
    pub semantic_weight: f64,
    pub proximity_weight: f64,
    pub recency_half_life_days: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            relevance_weight: constants::DEFAULT_RELEVANCE_WEIGHT,
            recency_weight: constants::DEFAULT_RECENCY_WEIGHT,
            semantic_weight: constants::DEFAULT_SEMANTIC_WEIGHT,
            proximity_weight: constants::DEFAULT_PROXIMITY_WEIGHT,
            recency_half_life_days: constants::DEFAULT_RECENCY_HALF_LIFE_DAYS,
        }
    }
}

/// Enrichment fan-out and cache sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// How many of the top ranked articles get enriched.
    pub top_n: usize,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
}

impl EnrichmentConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            top_n: constants::DEFAULT_ENRICHMENT_TOP_N,
            cache_ttl_secs: constants::DEFAULT_ENRICHMENT_CACHE_TTL_SECS,
            cache_capacity: constants::DEFAULT_ENRICHMENT_CACHE_CAPACITY,
        }
    }
}

/// Geo-bucket sizing and interaction decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub bucket_size_degrees: f64,
    pub half_life_minutes: f64,
    pub default_radius_km: f64,
    pub default_limit: usize,
}

impl TrendingConfig {
    /// Per-minute decay constant: `ln 2 / half-life`.
    pub fn lambda(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_minutes
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            bucket_size_degrees: constants::DEFAULT_BUCKET_SIZE_DEGREES,
            half_life_minutes: constants::DEFAULT_TREND_HALF_LIFE_MINUTES,
            default_radius_km: constants::DEFAULT_TRENDING_RADIUS_KM,
            default_limit: constants::DEFAULT_TRENDING_LIMIT,
        }
    }
}

/// Top-level configuration. Every section falls back to its defaults, so an
/// empty TOML document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub ranking: RankingConfig,
    pub enrichment: EnrichmentConfig,
    pub trending: TrendingConfig,
}

impl NewsConfig {
    pub fn from_toml_str(raw: &str) -> NewsResult<Self> {
        toml::from_str(raw).map_err(|e| NewsError::Validation(format!("invalid config: {e}")))
    }
}
