//! # newsflow-retrieval
//!
//! The query pipeline: understanding, multi-strategy retrieval, weighted
//! ranking, and response assembly. [`QueryEngine`] wires the stages together
//! over an article store and a language model.

mod context;
mod engine;
mod orchestrator;
mod ranking;
mod strategies;

pub use context::RetrievalContext;
pub use engine::QueryEngine;
pub use orchestrator::RetrievalOrchestrator;
pub use ranking::RankingEngine;
pub use strategies::{default_registry, RetrievalStrategy};
