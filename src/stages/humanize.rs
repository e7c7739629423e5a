//! Humanizer stage: repeated rewrite passes that strip machine-writing
//! tells. Each pass has its own focus and feeds on the previous pass's
//! output. Headline and title sections are left alone.

use tracing::{debug, info};

use crate::config::HumanizerSettings;
use crate::error::PipelineError;
use crate::llm::LlmClient;
use crate::llm::prompts::{HUMANIZER_SYSTEM, HumanizePass, build_humanize_prompt};
use crate::models::Article;
use crate::patterns::sentence_variation;

/// Run the humanizer. Passes are clamped to 1..=3; a disabled humanizer
/// returns the article untouched.
pub async fn execute_humanize(
    llm: &dyn LlmClient,
    mut article: Article,
    settings: &HumanizerSettings,
) -> Result<Article, PipelineError> {
    if !settings.enabled {
        info!("humanizer disabled, skipping");
        return Ok(article);
    }
    let passes = settings.passes.clamp(1, 3);

    for pass_index in 0..passes {
        let pass = HumanizePass::for_index(pass_index);
        debug!(pass = pass_index + 1, ?pass, "humanizer pass");

        for section in &mut article.sections {
            if matches!(section.name.as_str(), "headline" | "title") {
                continue;
            }
            let metrics = sentence_variation(&section.body);
            let prompt =
                build_humanize_prompt(&section.body, pass, settings.intensity, &metrics);
            let rewritten = llm.complete(Some(HUMANIZER_SYSTEM), &prompt).await?;
            let rewritten = rewritten.trim();
            if !rewritten.is_empty() {
                section.body = rewritten.to_string();
            }
        }
    }

    info!(passes, words = article.word_count(), "humanizing complete");
    Ok(article)
}
