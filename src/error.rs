use thiserror::Error;

use crate::models::Stage;

/// Errors from the LLM collaborator
#[derive(Debug, Error)]
pub enum LlmError {
    /// No credential configured for any supported provider
    #[error("no LLM credential configured ({0} not set)")]
    Unavailable(String),

    /// Provider returned a non-success status
    #[error("LLM provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    /// Network-level failure (timeout, connect, decode)
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider responded but with no usable text
    #[error("LLM returned an empty or malformed response")]
    EmptyResponse,
}

impl LlmError {
    /// Whether this error is worth one automatic retry
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Transport(e) => e.is_timeout() || e.is_connect(),
            LlmError::Provider { status, .. } => matches!(status, 429 | 500..=504),
            _ => false,
        }
    }
}

/// Errors from the search collaborator
#[derive(Debug, Error)]
pub enum SearchError {
    /// No credential configured for any supported provider
    #[error("no search provider configured ({0} not set)")]
    Unavailable(String),

    /// Provider returned a non-success status
    #[error("search provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    /// Network-level failure
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Every generated query failed against the provider
    #[error("all {0} search queries failed")]
    AllQueriesFailed(usize),
}

impl SearchError {
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Transport(e) => e.is_timeout() || e.is_connect(),
            SearchError::Provider { status, .. } => matches!(status, 429 | 500..=504),
            _ => false,
        }
    }
}

/// Top-level error taxonomy for a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unknown media type: {0}")]
    UnknownMediaType(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{stage} stage failed: {source}")]
    Failed {
        stage: Stage,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Wrap a stage-local error with the stage that produced it
    pub fn failed(stage: Stage, source: PipelineError) -> Self {
        PipelineError::Failed {
            stage,
            source: Box::new(source),
        }
    }

    /// The stage a failed run stopped in, if this is a stage failure
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
