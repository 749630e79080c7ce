//! Default tuning constants, grouped by subsystem.

/// Ranking weight defaults. The weights need not sum to 1.
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.35;
pub const DEFAULT_RECENCY_WEIGHT: f64 = 0.25;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.30;
pub const DEFAULT_PROXIMITY_WEIGHT: f64 = 0.10;
pub const DEFAULT_RECENCY_HALF_LIFE_DAYS: f64 = 7.0;

/// Enrichment defaults.
pub const DEFAULT_ENRICHMENT_TOP_N: usize = 5;
pub const DEFAULT_ENRICHMENT_CACHE_TTL_SECS: u64 = 900;
pub const DEFAULT_ENRICHMENT_CACHE_CAPACITY: u64 = 10_000;

/// Trending defaults. The half-life is 6 hours of interaction decay.
pub const DEFAULT_BUCKET_SIZE_DEGREES: f64 = 0.5; // ~55 km at the equator
pub const DEFAULT_TREND_HALF_LIFE_MINUTES: f64 = 360.0;
pub const DEFAULT_TRENDING_RADIUS_KM: f64 = 25.0;
pub const MIN_TRENDING_RADIUS_KM: f64 = 1.0;
pub const MAX_TRENDING_RADIUS_KM: f64 = 200.0;
pub const DEFAULT_TRENDING_LIMIT: usize = 5;
pub const MAX_TRENDING_LIMIT: usize = 20;

/// Retrieval defaults. Strategies over-fetch to compensate for the
/// ranking/filtering that happens after the merge.
pub const OVERFETCH_FACTOR: usize = 3;
pub const DEFAULT_QUERY_LIMIT: usize = 10;
pub const MAX_QUERY_LIMIT: usize = 50;
pub const DEFAULT_QUERY_RADIUS_KM: f64 = 10.0;
pub const MAX_QUERY_RADIUS_KM: f64 = 100.0;

/// Request validation bounds.
pub const MAX_QUERY_LENGTH: usize = 500;
pub const MAX_REQUESTED_RESULTS: usize = 100;
pub const MAX_REQUESTED_RADIUS_KM: f64 = 500.0;

/// Cache sizing.
pub const DEFAULT_QUERY_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_FEED_CACHE_CAPACITY: u64 = 10_000;
