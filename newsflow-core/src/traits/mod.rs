//! Collaborator seams: article/trend persistence and the language model.

mod model;
mod store;

pub use model::LanguageModel;
pub use store::{retrieval_order, ArticleFilter, ArticleStore, BoundingBox, TrendStore};
