use serde::{Deserialize, Serialize};

/// Coarse classification of query purpose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QueryIntent {
    Category,
    Score,
    Search,
    Source,
    Nearby,
    /// Sentinel for unrecognized intent strings from the model.
    Unknown,
}

impl QueryIntent {
    /// Parse a model-supplied intent string. Unrecognized values map to
    /// `Unknown` rather than failing.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "category" => Self::Category,
            "score" => Self::Score,
            "source" => Self::Source,
            "nearby" => Self::Nearby,
            "search" => Self::Search,
            _ => Self::Unknown,
        }
    }

    /// Lowercase label used in response metadata.
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Score => "score",
            Self::Search => "search",
            Self::Source => "source",
            Self::Nearby => "nearby",
            Self::Unknown => "unknown",
        }
    }
}
