use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::models::SearchResult;
use crate::retry::{RetryPolicy, with_retry};
use crate::search::SearchClient;

const GOOGLE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search client. The API caps `num` at 10 regardless of
/// the configured result limit.
pub struct GoogleClient {
    client: Client,
    api_key: String,
    cse_id: String,
    max_results: usize,
    retry: RetryPolicy,
}

impl GoogleClient {
    /// Create a client using `GOOGLE_API_KEY` and `GOOGLE_CSE_ID` from
    /// the environment
    pub fn from_env(settings: &SearchSettings) -> Result<Self, SearchError> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| SearchError::Unavailable("GOOGLE_API_KEY".into()))?;
        let cse_id = std::env::var("GOOGLE_CSE_ID")
            .map_err(|_| SearchError::Unavailable("GOOGLE_CSE_ID".into()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(SearchError::Transport)?;
        Ok(Self {
            client,
            api_key,
            cse_id,
            max_results: settings.max_results.min(10),
            retry: RetryPolicy::default(),
        })
    }

    async fn send(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        debug!(query, "sending Google search");
        let num = self.max_results.to_string();
        let response = self
            .client
            .get(GOOGLE_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
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

        let body: GoogleResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .map(|item| SearchResult::new(item.link, item.title, item.snippet))
            .collect())
    }
}

#[async_trait]
impl SearchClient for GoogleClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        with_retry(&self.retry, "google.search", SearchError::is_transient, || {
            self.send(query)
        })
        .await
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}
