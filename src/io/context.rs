use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;
use crate::models::TopicContext;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContextValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl ContextValue {
    fn render(self) -> String {
        match self {
            ContextValue::Text(s) => s,
            ContextValue::Number(n) => n.to_string(),
            ContextValue::Flag(b) => b.to_string(),
            ContextValue::List(items) => items.join(", "),
        }
    }
}

/// Parse a JSON object of topic context. Values may be strings, numbers,
/// booleans, or string lists; everything is flattened to text for prompt
/// inclusion.
pub fn parse_context_json(json: &str) -> Result<TopicContext, PipelineError> {
    let raw: std::collections::BTreeMap<String, ContextValue> = serde_json::from_str(json)
        .map_err(|e| PipelineError::Validation(format!("invalid context JSON: {e}")))?;
    Ok(TopicContext(
        raw.into_iter().map(|(k, v)| (k, v.render())).collect(),
    ))
}

/// Read and parse a context file
pub fn load_context_file(path: &Path) -> Result<TopicContext, PipelineError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Validation(format!("cannot read context file {}: {e}", path.display()))
    })?;
    parse_context_json(&content)
}
