use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PipelineError;
use crate::models::{Intensity, Length};

/// Application configuration, loaded once at startup and passed into the
/// pipeline as an immutable value. Credentials are read from the
/// environment only when provider clients are constructed, never mid-run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub article: ArticleSettings,
    pub humanizer: HumanizerSettings,
    pub output: OutputSettings,
    /// Optional TOML file overriding the built-in media-type registry
    pub registry_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSettings {
    /// "gemini" or "perplexity". When unset, the first provider with a
    /// credential in the environment is used (gemini, then perplexity).
    pub provider: Option<String>,
    /// Provider model name; each client has its own default
    pub model: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            temperature: 0.7,
            max_tokens: 4000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    /// "exa" or "google". When unset, the first provider with a
    /// credential in the environment is used (exa, then google).
    pub provider: Option<String>,
    /// Per-query result cap
    pub max_results: usize,
    /// Cap on generated search queries (hard limit 8)
    pub max_queries: usize,
    /// Restrict results to these domains when the provider supports it
    pub include_domains: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: None,
            max_results: 10,
            max_queries: 5,
            include_domains: Vec::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticleSettings {
    pub media_type: String,
    pub length: Length,
    pub include_sources: bool,
    pub fact_check: bool,
}

impl Default for ArticleSettings {
    fn default() -> Self {
        Self {
            media_type: "tech_news".to_string(),
            length: Length::Medium,
            include_sources: true,
            fact_check: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HumanizerSettings {
    pub enabled: bool,
    pub passes: u8,
    pub intensity: Intensity,
}

impl Default for HumanizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            passes: 2,
            intensity: Intensity::Medium,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub filename_template: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./articles"),
            filename_template: "{date}_{topic}_{media_type}.md".to_string(),
        }
    }
}

impl AppConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("invalid config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(1..=3).contains(&self.humanizer.passes) {
            return Err(PipelineError::Config(format!(
                "humanizer.passes must be between 1 and 3, got {}",
                self.humanizer.passes
            )));
        }
        if !(1..=100).contains(&self.search.max_results) {
            return Err(PipelineError::Config(format!(
                "search.max_results must be between 1 and 100, got {}",
                self.search.max_results
            )));
        }
        if !(1..=8).contains(&self.search.max_queries) {
            return Err(PipelineError::Config(format!(
                "search.max_queries must be between 1 and 8, got {}",
                self.search.max_queries
            )));
        }
        if let Some(provider) = &self.llm.provider {
            if !matches!(provider.as_str(), "gemini" | "perplexity") {
                return Err(PipelineError::Config(format!(
                    "unsupported llm.provider '{provider}' (expected gemini or perplexity)"
                )));
            }
        }
        if let Some(provider) = &self.search.provider {
            if !matches!(provider.as_str(), "exa" | "google") {
                return Err(PipelineError::Config(format!(
                    "unsupported search.provider '{provider}' (expected exa or google)"
                )));
            }
        }
        Ok(())
    }
}

/// Reject empty or degenerate topics before any provider call
pub fn validate_topic(topic: &str) -> Result<(), PipelineError> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Validation("topic cannot be empty".into()));
    }
    if trimmed.len() < 3 {
        return Err(PipelineError::Validation(
            "topic must be at least 3 characters long".into(),
        ));
    }
    Ok(())
}
