//! Deterministic collaborator fakes shared by stage and pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{LlmError, SearchError};
use crate::llm::LlmClient;
use crate::models::SearchResult;
use crate::search::SearchClient;

/// Returns queued responses in order, recording every prompt
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _system: Option<&str>, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Fails every completion with a non-transient provider error
pub struct FailingLlm {
    pub calls: AtomicUsize,
}

impl FailingLlm {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FailingLlm {
    async fn complete(&self, _system: Option<&str>, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::Provider {
            status: 401,
            message: "invalid api key".into(),
        })
    }
}

/// Returns the same fixed results for every query
pub struct StaticSearch {
    results: Vec<SearchResult>,
    pub calls: AtomicUsize,
}

impl StaticSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchClient for StaticSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

/// Fails every query
pub struct FailingSearch {
    pub calls: AtomicUsize,
}

impl FailingSearch {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchClient for FailingSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SearchError::Provider {
            status: 500,
            message: "backend unavailable".into(),
        })
    }
}
