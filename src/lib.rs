pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod patterns;
pub mod pipeline;
pub mod registry;
pub mod retry;
pub mod search;
pub mod sources;
pub mod stages;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AppConfig, validate_topic};
pub use error::{LlmError, PipelineError, SearchError};
pub use io::{load_context_file, render_markdown, write_article};
pub use models::{Article, Intensity, Length, TopicContext};
pub use pipeline::{Pipeline, RunReport, RunRequest};
pub use registry::{MediaProfile, Registry};
