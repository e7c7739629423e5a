//! Editing stage: revises each section body for flow and consistency.
//! Section names, count, and order are fixed at write time; this stage
//! only ever replaces body text.

use tracing::{info, warn};

use crate::error::PipelineError;
use crate::llm::LlmClient;
use crate::llm::prompts::{WRITER_SYSTEM, build_edit_prompt};
use crate::models::{Article, ResearchData};
use crate::registry::MediaProfile;

/// Result of the editing stage
#[derive(Debug)]
pub struct EditOutcome {
    pub article: Article,
    /// Claims the editor could not ground in the research notes.
    /// Advisory only; flagged claims never fail the run.
    pub flagged_claims: Vec<String>,
}

/// Run the editing stage over every section, showing each prompt the
/// neighboring sections for continuity.
pub async fn execute_edit(
    llm: &dyn LlmClient,
    profile: &MediaProfile,
    mut article: Article,
    research: &ResearchData,
    fact_check: bool,
) -> Result<EditOutcome, PipelineError> {
    let mut flagged_claims = Vec::new();

    for index in 0..article.sections.len() {
        let previous = index.checked_sub(1).map(|i| &article.sections[i]);
        let next = article.sections.get(index + 1);
        let prompt = build_edit_prompt(
            &article.topic,
            profile,
            &article.sections[index],
            previous,
            next,
            &research.notes,
            fact_check,
        );
        let response = llm.complete(Some(WRITER_SYSTEM), &prompt).await?;
        let (body, flags) = split_flags(&response);

        if body.is_empty() {
            // Keep the draft rather than blanking the section
            warn!(section = %article.sections[index].name, "editor returned no text, keeping draft");
        } else {
            article.sections[index].body = body;
        }
        for flag in &flags {
            warn!(section = %article.sections[index].name, claim = %flag, "unsupported claim flagged");
        }
        flagged_claims.extend(flags);
    }

    info!(
        flagged = flagged_claims.len(),
        words = article.word_count(),
        "editing complete"
    );
    Ok(EditOutcome {
        article,
        flagged_claims,
    })
}

/// Separate trailing `FLAG:` lines from the revised body
fn split_flags(response: &str) -> (String, Vec<String>) {
    let mut body_lines = Vec::new();
    let mut flags = Vec::new();
    for line in response.lines() {
        match line.trim().strip_prefix("FLAG:") {
            Some(claim) if !claim.trim().is_empty() => flags.push(claim.trim().to_string()),
            _ => body_lines.push(line),
        }
    }
    (body_lines.join("\n").trim().to_string(), flags)
}
