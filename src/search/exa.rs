use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::models::SearchResult;
use crate::retry::{RetryPolicy, with_retry};
use crate::search::SearchClient;

const EXA_URL: &str = "https://api.exa.ai/search";
const SNIPPET_MAX_CHARS: u32 = 1000;

/// Exa neural search client
pub struct ExaClient {
    client: Client,
    api_key: String,
    max_results: usize,
    include_domains: Vec<String>,
    retry: RetryPolicy,
}

impl ExaClient {
    /// Create a client using `EXA_API_KEY` from the environment
    pub fn from_env(settings: &SearchSettings) -> Result<Self, SearchError> {
        let api_key = std::env::var("EXA_API_KEY")
            .map_err(|_| SearchError::Unavailable("EXA_API_KEY".into()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(SearchError::Transport)?;
        Ok(Self {
            client,
            api_key,
            max_results: settings.max_results,
            include_domains: settings.include_domains.clone(),
            retry: RetryPolicy::default(),
        })
    }

    async fn send(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let request = ExaRequest {
            query: query.to_string(),
            num_results: self.max_results,
            include_domains: if self.include_domains.is_empty() {
                None
            } else {
                Some(self.include_domains.clone())
            },
            contents: ExaContents {
                text: ExaTextOptions {
                    max_characters: SNIPPET_MAX_CHARS,
                },
            },
        };

        debug!(query, "sending Exa search");
        let response = self
            .client
            .post(EXA_URL)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: ExaResponse = response.json().await?;
        Ok(body
            .results
            .into_iter()
            .map(|r| SearchResult::new(r.url, r.title.unwrap_or_default(), r.text.unwrap_or_default()))
            .collect())
    }
}

#[async_trait]
impl SearchClient for ExaClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        with_retry(&self.retry, "exa.search", SearchError::is_transient, || {
            self.send(query)
        })
        .await
    }
}

#[derive(Debug, Serialize)]
struct ExaRequest {
    query: String,
    #[serde(rename = "numResults")]
    num_results: usize,
    #[serde(rename = "includeDomains", skip_serializing_if = "Option::is_none")]
    include_domains: Option<Vec<String>>,
    contents: ExaContents,
}

#[derive(Debug, Serialize)]
struct ExaContents {
    text: ExaTextOptions,
}

#[derive(Debug, Serialize)]
struct ExaTextOptions {
    #[serde(rename = "maxCharacters")]
    max_characters: u32,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
}
