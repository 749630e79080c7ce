use serde_json::Value;

use crate::enrichment::EnrichmentRequest;
use crate::errors::NewsResult;
use crate::query::QueryContext;

/// Optional language-model capability behind query understanding and
/// enrichment.
///
/// Implementations return raw JSON; the callers own schema decoding so a
/// misbehaving model degrades to the rule-based path instead of failing the
/// request.
pub trait LanguageModel: Send + Sync {
    /// Whether the capability is available at all. Disabled models are never
    /// called.
    fn enabled(&self) -> bool {
        true
    }

    /// Structured interpretation of a user query.
    fn complete_query(&self, context: &QueryContext) -> NewsResult<Value>;

    /// Summary/entities/relevance JSON for one article.
    fn complete_enrichment(&self, request: &EnrichmentRequest<'_>) -> NewsResult<Value>;
}
