//! Research stage: generate search queries, fan them out to the search
//! provider, deduplicate the hits, and synthesize research notes.

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::SearchSettings;
use crate::error::{PipelineError, SearchError};
use crate::llm::LlmClient;
use crate::llm::prompts::{RESEARCH_SYSTEM, build_query_prompt, build_synthesis_prompt};
use crate::models::{PipelineState, ResearchData, SourceSet};
use crate::search::SearchClient;
use crate::sources::normalize_sources;

/// Run the research stage. Queries are searched concurrently; per-query
/// failures are tolerated as long as at least one query succeeds.
pub async fn execute_research(
    llm: &dyn LlmClient,
    search: &dyn SearchClient,
    state: &PipelineState,
    settings: &SearchSettings,
) -> Result<ResearchData, PipelineError> {
    let queries = generate_queries(llm, state, settings.max_queries).await?;
    info!(count = queries.len(), "generated search queries");

    // One concurrent search per query; result order follows query order
    let outcomes = join_all(queries.iter().map(|q| search.search(q))).await;

    let mut raw = Vec::new();
    let mut failures = 0usize;
    for (query, outcome) in queries.iter().zip(outcomes) {
        match outcome {
            Ok(results) => raw.extend(results),
            Err(e) => {
                warn!(query, "search query failed: {e}");
                failures += 1;
            }
        }
    }
    if failures == queries.len() {
        return Err(SearchError::AllQueriesFailed(failures).into());
    }

    let sources = normalize_sources(raw);
    info!(sources = sources.len(), "collected deduplicated sources");

    let notes = synthesize_notes(llm, state, &sources).await;

    Ok(ResearchData {
        queries,
        sources,
        notes,
    })
}

/// Ask the LLM for search queries. A provider failure here aborts the
/// stage; an empty or unusable response falls back to the bare topic.
async fn generate_queries(
    llm: &dyn LlmClient,
    state: &PipelineState,
    max_queries: usize,
) -> Result<Vec<String>, PipelineError> {
    let prompt = build_query_prompt(&state.topic, &state.context, max_queries);
    let response = llm.complete(Some(RESEARCH_SYSTEM), &prompt).await?;

    let mut queries: Vec<String> = response
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', ' ']).to_string())
        .filter(|line| !line.is_empty())
        .take(max_queries)
        .collect();

    if queries.is_empty() {
        warn!("query generation returned nothing usable, searching the topic directly");
        queries.push(state.topic.clone());
    }
    Ok(queries)
}

/// Synthesize notes from the sources. On LLM failure the stage degrades
/// to concatenated snippets rather than aborting a run that already has
/// usable sources.
async fn synthesize_notes(
    llm: &dyn LlmClient,
    state: &PipelineState,
    sources: &SourceSet,
) -> String {
    let prompt = build_synthesis_prompt(&state.topic, sources);
    match llm.complete(Some(RESEARCH_SYSTEM), &prompt).await {
        Ok(notes) => notes,
        Err(e) => {
            warn!("note synthesis failed, falling back to raw snippets: {e}");
            sources
                .iter()
                .map(|s| format!("{}: {}", s.title, s.snippet))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Length, SearchResult, TopicContext};
    use crate::testing::{FailingSearch, ScriptedLlm, StaticSearch};

    fn state() -> PipelineState {
        PipelineState::new(
            "solid-state batteries".into(),
            TopicContext::default(),
            "tech_news".into(),
            Length::Medium,
        )
    }

    #[tokio::test]
    async fn test_research_happy_path() {
        let llm = ScriptedLlm::new([
            "solid-state battery breakthrough\nbattery energy density 2026",
            "Synthesized notes about batteries.",
        ]);
        let search = StaticSearch::new(vec![
            SearchResult::new("https://a.org/one", "Battery paper", "details"),
            SearchResult::new("https://a.org/one?ref=x", "Dup", "dup"),
            SearchResult::new("https://b.org/two", "Industry report", "more"),
        ]);

        let data = execute_research(&llm, &search, &state(), &SearchSettings::default())
            .await
            .unwrap();

        assert_eq!(data.queries.len(), 2);
        assert_eq!(search.call_count(), 2);
        // Both queries return the same hits; dedup collapses them
        assert_eq!(data.sources.len(), 2);
        assert_eq!(data.notes, "Synthesized notes about batteries.");
    }

    #[tokio::test]
    async fn test_all_queries_failed_aborts() {
        let llm = ScriptedLlm::new(["query one\nquery two"]);
        let search = FailingSearch::new();

        let err = execute_research(&llm, &search, &state(), &SearchSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Search(SearchError::AllQueriesFailed(2))
        ));
        assert_eq!(search.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_query_response_falls_back_to_topic() {
        let llm = ScriptedLlm::new(["\n\n", "notes"]);
        let search = StaticSearch::new(vec![SearchResult::new(
            "https://a.org/one",
            "Hit",
            "snippet",
        )]);

        let data = execute_research(&llm, &search, &state(), &SearchSettings::default())
            .await
            .unwrap();

        assert_eq!(data.queries, vec!["solid-state batteries".to_string()]);
    }

    #[tokio::test]
    async fn test_synthesis_failure_degrades_to_snippets() {
        // Second LLM call (synthesis) has no scripted response
        let llm = ScriptedLlm::new(["one query"]);
        let search = StaticSearch::new(vec![SearchResult::new(
            "https://a.org/one",
            "Battery paper",
            "cell chemistry details",
        )]);

        let data = execute_research(&llm, &search, &state(), &SearchSettings::default())
            .await
            .unwrap();

        assert!(data.notes.contains("Battery paper: cell chemistry details"));
    }

    #[tokio::test]
    async fn test_query_cap_respected() {
        let many = (1..=10).map(|i| format!("query {i}")).collect::<Vec<_>>().join("\n");
        let llm = ScriptedLlm::new([many, "notes".to_string()]);
        let search = StaticSearch::new(vec![SearchResult::new("https://a.org/x", "t", "s")]);
        let settings = SearchSettings {
            max_queries: 3,
            ..SearchSettings::default()
        };

        let data = execute_research(&llm, &search, &state(), &settings)
            .await
            .unwrap();

        assert_eq!(data.queries.len(), 3);
        assert_eq!(search.call_count(), 3);
    }
}
