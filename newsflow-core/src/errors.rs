use uuid::Uuid;

/// Error taxonomy for the retrieval core.
///
/// Capability errors are recovered internally via rule-based fallbacks and
/// never surface from the query pipeline; they exist so capability
/// implementations can report what went wrong. Validation errors reject a
/// request before the pipeline runs. `ArticleNotFound` is fatal to the
/// operation that raised it.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("article not found: {0}")]
    ArticleNotFound(Uuid),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("language model disabled")]
    CapabilityDisabled,

    #[error("language model call failed: {0}")]
    Capability(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("store operation failed: {0}")]
    Store(String),
}

pub type NewsResult<T> = Result<T, NewsError>;
