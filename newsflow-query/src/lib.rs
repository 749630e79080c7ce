//! # newsflow-query
//!
//! Query understanding and article enrichment. The language model is the
//! primary path for both; a rule-based extractor covers the model being
//! disabled, failing, or returning malformed output, so every query parses.

mod enrich;
mod parser;
mod rules;
mod schema;

pub use enrich::EnrichmentAssembler;
pub use parser::QueryParser;
pub use rules::RuleBasedExtractor;
