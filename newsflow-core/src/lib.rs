//! # newsflow-core
//!
//! Foundation crate for the Newsflow contextual news retrieval system.
//! Defines all types, traits, errors, config, constants, and geo utilities.
//! Every other crate in the workspace depends on this.

pub mod article;
pub mod config;
pub mod constants;
pub mod enrichment;
pub mod errors;
pub mod geo;
pub mod ingest;
pub mod intent;
pub mod query;
pub mod request;
pub mod response;
pub mod score;
pub mod traits;
pub mod trend;

// Re-export the most commonly used types at the crate root.
pub use article::NewsArticle;
pub use config::NewsConfig;
pub use errors::{NewsError, NewsResult};
pub use intent::QueryIntent;
pub use query::{ParsedQuery, QueryContext, QueryFilters};
pub use request::{GeoPoint, QueryRequest};
