use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmSettings;
use crate::error::LlmError;
use crate::retry::{RetryPolicy, with_retry};

/// The single capability the pipeline needs from an LLM provider.
/// Object-safe so tests can substitute deterministic fakes.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, LlmError>;
}

/// Request parameters shared by the concrete clients
#[derive(Debug, Clone)]
pub struct LlmOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl LlmOptions {
    fn from_settings(settings: &LlmSettings, default_model: &str) -> Self {
        Self {
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
            retry: RetryPolicy::default(),
        }
    }
}

fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(LlmError::Transport)
}

// ---------------------------------------------------------------------------
// Gemini

const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini client (generateContent endpoint)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    options: LlmOptions,
}

impl GeminiClient {
    /// Create a client using `GEMINI_API_KEY` from the environment
    pub fn from_env(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| LlmError::Unavailable("GEMINI_API_KEY".into()))?;
        let options = LlmOptions::from_settings(settings, GEMINI_DEFAULT_MODEL);
        Ok(Self {
            client: http_client(options.timeout)?,
            api_key,
            options,
        })
    }

    async fn send(&self, system: Option<&str>, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.options.model
        );
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: system.map(|s| GeminiContent {
                parts: vec![GeminiPart {
                    text: s.to_string(),
                }],
            }),
            generation_config: GeminiGenerationConfig {
                temperature: self.options.temperature,
                max_output_tokens: self.options.max_tokens,
            },
        };

        debug!(model = %self.options.model, "sending Gemini request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message: truncate(&message, 500),
            });
        }

        let body: GeminiResponse = response.json().await?;
        let text: String = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, LlmError> {
        with_retry(
            &self.options.retry,
            "gemini.complete",
            LlmError::is_transient,
            || self.send(system, prompt),
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

// ---------------------------------------------------------------------------
// Perplexity

const PERPLEXITY_DEFAULT_MODEL: &str = "sonar-pro";
const PERPLEXITY_URL: &str = "https://api.perplexity.ai/chat/completions";

/// Perplexity client (OpenAI-style chat completions)
pub struct PerplexityClient {
    client: Client,
    api_key: String,
    options: LlmOptions,
}

impl PerplexityClient {
    /// Create a client using `PERPLEXITY_API_KEY` from the environment
    pub fn from_env(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = std::env::var("PERPLEXITY_API_KEY")
            .map_err(|_| LlmError::Unavailable("PERPLEXITY_API_KEY".into()))?;
        let options = LlmOptions::from_settings(settings, PERPLEXITY_DEFAULT_MODEL);
        Ok(Self {
            client: http_client(options.timeout)?,
            api_key,
            options,
        })
    }

    async fn send(&self, system: Option<&str>, prompt: &str) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatRequest {
            model: self.options.model.clone(),
            messages,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        debug!(model = %self.options.model, "sending Perplexity request");
        let response = self
            .client
            .post(PERPLEXITY_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message: truncate(&message, 500),
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}

#[async_trait]
impl LlmClient for PerplexityClient {
    async fn complete(&self, system: Option<&str>, prompt: &str) -> Result<String, LlmError> {
        with_retry(
            &self.options.retry,
            "perplexity.complete",
            LlmError::is_transient,
            || self.send(system, prompt),
        )
        .await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
