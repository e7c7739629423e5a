use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single raw hit from the search collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub retrieved_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn new(url: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
            retrieved_at: Utc::now(),
        }
    }
}

/// Ordered, URL-deduplicated source citations. Insertion order is
/// first-seen order across all queries; no two entries share a normalized
/// URL. Built only by `sources::normalize_sources`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSet {
    entries: Vec<SearchResult>,
}

impl SourceSet {
    pub(crate) fn from_unique(entries: Vec<SearchResult>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.entries.get(index)
    }

    pub fn as_slice(&self) -> &[SearchResult] {
        &self.entries
    }
}

/// Output of the research stage; read-only for the rest of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchData {
    /// Search queries in the order they were generated
    pub queries: Vec<String>,
    /// Deduplicated sources in first-seen order
    pub sources: SourceSet,
    /// Synthesized findings used to ground the writer
    pub notes: String,
}
