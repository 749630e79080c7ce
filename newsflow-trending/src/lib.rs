//! # newsflow-trending
//!
//! Location-aware trending feeds. Interaction events are aggregated per
//! (geo bucket, article) with exponential time decay; feeds scan the buckets
//! around the caller and rank articles by their best decayed score.

mod cache;
mod engine;

pub use cache::{FeedCache, FeedKey};
pub use engine::TrendingEngine;
