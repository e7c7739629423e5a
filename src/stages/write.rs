//! Writing stage: drafts the article section by section, following the
//! media-type template. Sections are written sequentially so each prompt
//! can show what came before.

use chrono::Utc;
use tracing::info;

use crate::error::PipelineError;
use crate::llm::LlmClient;
use crate::llm::prompts::{WRITER_SYSTEM, build_section_prompt};
use crate::models::{Article, ArticleSection, PipelineState, ResearchData};
use crate::registry::{MediaProfile, SectionSpec};
use crate::sources::collapse_whitespace;

/// Run the writing stage. The section list and order come from the
/// media-type profile; the total word budget is split across sections
/// proportionally to their weights.
pub async fn execute_write(
    llm: &dyn LlmClient,
    profile: &MediaProfile,
    state: &PipelineState,
    research: &ResearchData,
) -> Result<Article, PipelineError> {
    let total_words = state.length.target_words();
    let weight_sum = profile.weight_sum();

    let mut sections: Vec<ArticleSection> = Vec::with_capacity(profile.sections.len());
    for (ordinal, spec) in profile.sections.iter().enumerate() {
        let target = section_budget(total_words, spec, weight_sum);
        let prompt = build_section_prompt(
            &state.topic,
            &state.context,
            profile,
            spec,
            target,
            &research.notes,
            &sections,
        );
        let body = llm.complete(Some(WRITER_SYSTEM), &prompt).await?;
        info!(section = %spec.name, words = body.split_whitespace().count(), "drafted section");
        sections.push(ArticleSection {
            name: spec.name.clone(),
            ordinal,
            body: body.trim().to_string(),
        });
    }

    let title = derive_title(&sections, &state.topic);

    Ok(Article {
        title,
        date: Utc::now().date_naive(),
        media_type: state.media_type.clone(),
        topic: state.topic.clone(),
        sections,
    })
}

fn section_budget(total_words: u32, spec: &SectionSpec, weight_sum: u32) -> usize {
    ((total_words * spec.weight) / weight_sum).max(30) as usize
}

/// The article title is the headline or title section if the template
/// has one, cleaned of markdown and quoting; otherwise the topic.
fn derive_title(sections: &[ArticleSection], topic: &str) -> String {
    sections
        .iter()
        .find(|s| matches!(s.name.as_str(), "headline" | "title"))
        .map(|s| {
            collapse_whitespace(s.body.trim_start_matches('#'))
                .trim_matches('"')
                .to_string()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| topic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Length, SourceSet, TopicContext};
    use crate::registry::Registry;
    use crate::testing::{FailingLlm, ScriptedLlm};

    fn state() -> PipelineState {
        PipelineState::new(
            "desalination advances".into(),
            TopicContext::default(),
            "tech_news".into(),
            Length::Medium,
        )
    }

    fn research() -> ResearchData {
        ResearchData {
            queries: vec!["desalination 2026".into()],
            sources: SourceSet::default(),
            notes: "Key fact: membrane efficiency doubled.".into(),
        }
    }

    #[tokio::test]
    async fn test_sections_follow_template_order() {
        let llm = ScriptedLlm::new([
            "# Membrane Efficiency Doubles",
            "opening text",
            "story text",
            "stakes text",
            "outlook text",
        ]);
        let registry = Registry::builtin();
        let profile = registry.get("tech_news").unwrap();

        let article = execute_write(&llm, profile, &state(), &research())
            .await
            .unwrap();

        assert_eq!(
            article.section_names(),
            vec!["headline", "opening", "the_story", "why_it_matters", "what_next"]
        );
        assert_eq!(article.title, "Membrane Efficiency Doubles");
        assert_eq!(llm.call_count(), 5);
        // Later prompts see earlier sections
        let prompts = llm.recorded_prompts();
        assert!(prompts[2].contains("opening text"));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let llm = FailingLlm::new();
        let registry = Registry::builtin();
        let profile = registry.get("tech_news").unwrap();

        let err = execute_write(&llm, profile, &state(), &research())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Llm(_)));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_title_falls_back_to_topic() {
        let sections = vec![ArticleSection {
            name: "headline".into(),
            ordinal: 0,
            body: "  ".into(),
        }];
        assert_eq!(derive_title(&sections, "fallback topic"), "fallback topic");
        assert_eq!(derive_title(&[], "fallback topic"), "fallback topic");
    }

    #[test]
    fn test_section_budget_proportional() {
        let registry = Registry::builtin();
        let profile = registry.get("tech_news").unwrap();
        let weight_sum = profile.weight_sum();
        // the_story (weight 5) gets the biggest budget
        let story = section_budget(1200, &profile.sections[2], weight_sum);
        let headline = section_budget(1200, &profile.sections[0], weight_sum);
        assert!(story > headline);
        // A tiny total still yields a usable floor
        assert!(section_budget(10, &profile.sections[0], weight_sum) >= 30);
    }
}
