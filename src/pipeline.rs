//! Run orchestration: validates the request, walks the stages in order,
//! and wraps any stage failure with the stage it happened in. Stages
//! run sequentially; concurrency lives inside the research stage.

use std::path::PathBuf;

use tracing::info;
use uuid::Uuid;

use crate::config::{AppConfig, validate_topic};
use crate::error::PipelineError;
use crate::io::write_article;
use crate::llm::LlmClient;
use crate::models::{
    Article, Length, PipelineStage, PipelineState, SourceSet, Stage, TopicContext,
};
use crate::registry::Registry;
use crate::search::SearchClient;
use crate::stages::{execute_edit, execute_humanize, execute_research, execute_write};

/// One article request
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub topic: String,
    pub context: TopicContext,
    pub media_type: String,
    pub length: Length,
}

/// What a completed run produced
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub article: Article,
    pub sources: SourceSet,
    pub queries: Vec<String>,
    pub flagged_claims: Vec<String>,
}

/// The article pipeline. Collaborators are trait objects so runs can be
/// driven by any provider pair (or by fakes in tests).
pub struct Pipeline {
    llm: Box<dyn LlmClient>,
    search: Box<dyn SearchClient>,
    registry: Registry,
    config: AppConfig,
}

impl Pipeline {
    pub fn new(
        llm: Box<dyn LlmClient>,
        search: Box<dyn SearchClient>,
        registry: Registry,
        config: AppConfig,
    ) -> Self {
        Self {
            llm,
            search,
            registry,
            config,
        }
    }

    /// Run research, write, edit, humanize, and format for one topic.
    /// Fails fast: the first stage error aborts the run with no partial
    /// article.
    pub async fn run(&self, request: RunRequest) -> Result<RunReport, PipelineError> {
        validate_topic(&request.topic)?;
        // Resolve the profile up front so an unknown media type fails
        // before any provider call
        let profile = self.registry.get(&request.media_type)?;

        let run_id = Uuid::new_v4();
        let mut stage = PipelineStage::Created;
        info!(%run_id, topic = %request.topic, media_type = %request.media_type,
              length = %request.length, %stage, "starting run");

        let state = PipelineState::new(
            request.topic,
            request.context,
            request.media_type,
            request.length,
        );

        stage = PipelineStage::Researching;
        info!(%run_id, %stage, "stage transition");
        let research = execute_research(&*self.llm, &*self.search, &state, &self.config.search)
            .await
            .map_err(|e| PipelineError::failed(Stage::Research, e))?;

        stage = PipelineStage::Writing;
        info!(%run_id, %stage, "stage transition");
        let draft = execute_write(&*self.llm, profile, &state, &research)
            .await
            .map_err(|e| PipelineError::failed(Stage::Write, e))?;

        stage = PipelineStage::Editing;
        info!(%run_id, %stage, "stage transition");
        let edited = execute_edit(
            &*self.llm,
            profile,
            draft,
            &research,
            self.config.article.fact_check,
        )
        .await
        .map_err(|e| PipelineError::failed(Stage::Edit, e))?;

        stage = PipelineStage::Humanizing;
        info!(%run_id, %stage, "stage transition");
        let article = execute_humanize(&*self.llm, edited.article, &self.config.humanizer)
            .await
            .map_err(|e| PipelineError::failed(Stage::Humanize, e))?;

        stage = PipelineStage::Done;
        info!(%run_id, %stage, words = article.word_count(),
              sources = research.sources.len(), "run complete");

        Ok(RunReport {
            run_id,
            article,
            sources: research.sources,
            queries: research.queries,
            flagged_claims: edited.flagged_claims,
        })
    }

    /// Render a finished run to markdown and write it under the
    /// configured output directory
    pub fn save(&self, report: &RunReport) -> Result<PathBuf, PipelineError> {
        write_article(
            &report.article,
            &report.sources,
            self.config.article.include_sources,
            &self.config.output,
        )
        .map_err(|e| PipelineError::failed(Stage::Format, e))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
