pub mod client;
pub mod prompts;

pub use client::{GeminiClient, LlmClient, PerplexityClient};

use tracing::info;

use crate::config::LlmSettings;
use crate::error::LlmError;

/// Build an LLM client from config and environment credentials.
///
/// An explicit `llm.provider` setting is honored; otherwise the first
/// provider with a key in the environment wins, checked in the order
/// gemini, then perplexity.
pub fn client_from_env(settings: &LlmSettings) -> Result<Box<dyn LlmClient>, LlmError> {
    match settings.provider.as_deref() {
        Some("gemini") => {
            info!(provider = "gemini", "using configured LLM provider");
            Ok(Box::new(GeminiClient::from_env(settings)?))
        }
        Some("perplexity") => {
            info!(provider = "perplexity", "using configured LLM provider");
            Ok(Box::new(PerplexityClient::from_env(settings)?))
        }
        _ => {
            if let Ok(client) = GeminiClient::from_env(settings) {
                info!(provider = "gemini", "auto-selected LLM provider");
                return Ok(Box::new(client));
            }
            if let Ok(client) = PerplexityClient::from_env(settings) {
                info!(provider = "perplexity", "auto-selected LLM provider");
                return Ok(Box::new(client));
            }
            Err(LlmError::Unavailable(
                "GEMINI_API_KEY or PERPLEXITY_API_KEY".into(),
            ))
        }
    }
}
