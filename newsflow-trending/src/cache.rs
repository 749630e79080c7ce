//! Feed cache keyed by (bucket, radius, limit).

use moka::sync::Cache;

use newsflow_core::constants;
use newsflow_core::geo::BucketId;
use newsflow_core::response::TrendingResponse;

/// Cache key for one feed variant. Radius is kept in tenths of a km so the
/// key stays hashable without float equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedKey {
    pub bucket: BucketId,
    pub radius_tenths: i64,
    pub limit: usize,
}

impl FeedKey {
    pub fn new(bucket: BucketId, radius_km: f64, limit: usize) -> Self {
        Self {
            bucket,
            radius_tenths: (radius_km * 10.0).round() as i64,
            limit,
        }
    }
}

/// Whole-response cache for trending feeds.
///
/// Writes invalidate everything: events are frequent and feeds are cheap to
/// rebuild, so coarse invalidation beats tracking which keys a bucket write
/// touches.
pub struct FeedCache {
    inner: Cache<FeedKey, TrendingResponse>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(constants::DEFAULT_FEED_CACHE_CAPACITY)
                .build(),
        }
    }

    pub fn get(&self, key: &FeedKey) -> Option<TrendingResponse> {
        self.inner.get(key)
    }

    pub fn put(&self, key: FeedKey, response: TrendingResponse) {
        self.inner.insert(key, response);
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new()
    }
}
