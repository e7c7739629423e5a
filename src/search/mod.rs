pub mod exa;
pub mod google;

pub use exa::ExaClient;
pub use google::GoogleClient;

use async_trait::async_trait;
use tracing::info;

use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::models::SearchResult;

/// A web search provider. One call per query; the research stage fans
/// queries out concurrently over a single shared client.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

/// Build a search client from config and environment credentials.
///
/// An explicit `search.provider` setting is honored; otherwise the first
/// provider with credentials in the environment wins, checked in the
/// order exa, then google.
pub fn client_from_env(settings: &SearchSettings) -> Result<Box<dyn SearchClient>, SearchError> {
    match settings.provider.as_deref() {
        Some("exa") => {
            info!(provider = "exa", "using configured search provider");
            Ok(Box::new(ExaClient::from_env(settings)?))
        }
        Some("google") => {
            info!(provider = "google", "using configured search provider");
            Ok(Box::new(GoogleClient::from_env(settings)?))
        }
        _ => {
            if let Ok(client) = ExaClient::from_env(settings) {
                info!(provider = "exa", "auto-selected search provider");
                return Ok(Box::new(client));
            }
            if let Ok(client) = GoogleClient::from_env(settings) {
                info!(provider = "google", "auto-selected search provider");
                return Ok(Box::new(client));
            }
            Err(SearchError::Unavailable(
                "EXA_API_KEY or GOOGLE_API_KEY/GOOGLE_CSE_ID".into(),
            ))
        }
    }
}
