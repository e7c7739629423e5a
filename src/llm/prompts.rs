//! Prompt construction for every pipeline stage. All prompts are plain
//! strings; the stages parse responses with simple line-based rules
//! rather than structured output, so a slightly ill-formed response
//! degrades instead of failing.

use crate::models::{ArticleSection, Intensity, SourceSet, TopicContext};
use crate::patterns::{VariationMetrics, detect_ai_phrases};
use crate::registry::{MediaProfile, SectionSpec};

/// System prompt for the research stage
pub const RESEARCH_SYSTEM: &str = "You are a meticulous research assistant. \
You work only from the material you are given and never invent facts, \
names, dates, or figures.";

/// System prompt for the writing and editing stages
pub const WRITER_SYSTEM: &str = "You are a professional staff writer. You \
write clean, factual prose grounded strictly in the research notes and \
sources provided. You never fabricate information.";

/// System prompt for the humanizer stage
pub const HUMANIZER_SYSTEM: &str = "You are a line editor who makes prose \
read as if a person wrote it. You rephrase and restructure sentences but \
never alter facts, figures, names, or quotes.";

/// Ask for search queries, one per line
pub fn build_query_prompt(topic: &str, context: &TopicContext, max_queries: usize) -> String {
    let mut prompt = format!(
        "Generate up to {max_queries} web search queries to research the \
         following topic for an article.\n\nTopic: {topic}\n"
    );
    let rendered = context.render();
    if !rendered.is_empty() {
        prompt.push_str("\nAdditional context:\n");
        prompt.push_str(&rendered);
        prompt.push('\n');
    }
    prompt.push_str(
        "\nQueries should cover different angles: background, recent \
         developments, key people or organizations, and notable numbers.\n\
         Return one query per line with no numbering and no commentary.",
    );
    prompt
}

/// Ask for a synthesis of the collected sources into research notes
pub fn build_synthesis_prompt(topic: &str, sources: &SourceSet) -> String {
    format!(
        "Synthesize the following search results into concise research \
         notes for an article about: {topic}\n\n{}\n\
         Organize the notes as short paragraphs covering the key facts, \
         figures, people, and timeline. Cite nothing that is not in the \
         results above. Return only the notes.",
        format_sources_for_prompt(sources)
    )
}

/// Number the sources the way the stages reference them in prompts
pub fn format_sources_for_prompt(sources: &SourceSet) -> String {
    let mut out = String::new();
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} ({})\n{}\n\n",
            i + 1,
            source.title,
            source.url,
            source.snippet
        ));
    }
    out
}

/// Ask for the body of a single section
pub fn build_section_prompt(
    topic: &str,
    context: &TopicContext,
    profile: &MediaProfile,
    section: &SectionSpec,
    target_words: usize,
    notes: &str,
    written_so_far: &[ArticleSection],
) -> String {
    let mut prompt = format!(
        "You are writing an article for {} about: {topic}\n\
         Voice: {}\n",
        profile.tone.description, profile.tone.voice
    );
    if !profile.tone.style_guide.is_empty() {
        prompt.push_str("Style guide:\n");
        for rule in &profile.tone.style_guide {
            prompt.push_str(&format!("- {rule}\n"));
        }
    }
    if !context.is_empty() {
        prompt.push_str("\nNotes from the requester:\n");
        prompt.push_str(&context.render());
        prompt.push('\n');
    }
    prompt.push_str(&format!("\nResearch notes:\n{notes}\n"));

    if !written_so_far.is_empty() {
        prompt.push_str("\nSections already written:\n");
        for prior in written_so_far {
            prompt.push_str(&format!("## {}\n{}\n\n", prior.name, prior.body));
        }
    }

    prompt.push_str(&format!(
        "\nNow write the '{}' section. {}\n\
         Target length: about {target_words} words.\n\
         Return only the section text, no heading and no preamble.",
        section.name, section.guidance
    ));
    prompt
}

/// Ask for an edited version of one section, with its neighbors shown
/// for continuity
pub fn build_edit_prompt(
    topic: &str,
    profile: &MediaProfile,
    section: &ArticleSection,
    previous: Option<&ArticleSection>,
    next: Option<&ArticleSection>,
    notes: &str,
    fact_check: bool,
) -> String {
    let mut prompt = format!(
        "You are editing one section of an article for {} about: {topic}\n\
         Voice: {}\n\nResearch notes:\n{notes}\n",
        profile.tone.description, profile.tone.voice
    );

    if let Some(previous) = previous {
        prompt.push_str(&format!(
            "\nPreceding section ({}), for continuity only:\n{}\n",
            previous.name, previous.body
        ));
    }
    prompt.push_str(&format!(
        "\nSection to edit ({}):\n{}\n",
        section.name, section.body
    ));
    if let Some(next) = next {
        prompt.push_str(&format!(
            "\nFollowing section ({}), for continuity only:\n{}\n",
            next.name, next.body
        ));
    }

    prompt.push_str(
        "\nImprove clarity, flow, and transitions. Tighten wordy passages. \
         Do not add facts that are not in the notes, and do not change the \
         meaning of any claim.",
    );
    if fact_check {
        prompt.push_str(
            "\nIf any claim in the section is not supported by the research \
             notes, append a final line starting with 'FLAG:' naming it. \
             Otherwise append nothing.",
        );
    }
    prompt.push_str("\nReturn only the revised section text.");
    prompt
}

/// The concern each humanizer pass focuses on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanizePass {
    /// Break uniform sentence rhythm
    Variation,
    /// Remove stock machine phrasing
    PhraseRemoval,
    /// Final voice polish
    Polish,
}

impl HumanizePass {
    pub fn for_index(index: u8) -> Self {
        match index {
            0 => Self::Variation,
            1 => Self::PhraseRemoval,
            _ => Self::Polish,
        }
    }
}

/// Ask for one humanizing rewrite of a section body
pub fn build_humanize_prompt(
    body: &str,
    pass: HumanizePass,
    intensity: Intensity,
    metrics: &VariationMetrics,
) -> String {
    let mut prompt = String::from(
        "Rewrite the following passage so it reads naturally, as if written \
         by a person. Keep every fact, figure, name, and quote exactly as \
         it is. Keep roughly the same length.\n",
    );
    prompt.push_str(&format!("Rewrite intensity: {}\n", intensity.instruction()));

    match pass {
        HumanizePass::Variation => {
            prompt.push_str(
                "Focus on sentence rhythm: vary sentence length, mix short \
                 punchy sentences with longer ones, and avoid starting \
                 consecutive sentences the same way.\n",
            );
            if metrics.sentence_count >= 3 && metrics.variation_score < 0.3 {
                prompt.push_str(
                    "The current rhythm is very uniform; be aggressive about \
                     breaking it up.\n",
                );
            }
        }
        HumanizePass::PhraseRemoval => {
            let found = detect_ai_phrases(body);
            if found.is_empty() {
                prompt.push_str(
                    "Focus on word choice: replace generic or formulaic \
                     phrasing with concrete, specific language.\n",
                );
            } else {
                prompt.push_str("Remove or replace these phrases, which sound formulaic:\n");
                for (phrase, count) in found {
                    prompt.push_str(&format!("- \"{phrase}\" ({count}x)\n"));
                }
            }
        }
        HumanizePass::Polish => {
            prompt.push_str(
                "Focus on voice: make the prose confident and direct, trim \
                 hedging, and prefer the active voice.\n",
            );
        }
    }

    prompt.push_str(&format!(
        "\nPassage:\n{body}\n\nReturn only the rewritten passage."
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResult;
    use crate::patterns::sentence_variation;
    use crate::registry::Registry;
    use crate::sources::normalize_sources;

    #[test]
    fn test_query_prompt_includes_context() {
        let mut context = TopicContext::default();
        context
            .0
            .insert("organization".into(), "MIT".into());
        let prompt = build_query_prompt("fusion milestones", &context, 5);
        assert!(prompt.contains("fusion milestones"));
        assert!(prompt.contains("organization: MIT"));
        assert!(prompt.contains("up to 5"));
    }

    #[test]
    fn test_sources_numbered_in_order() {
        let sources = normalize_sources(vec![
            SearchResult::new("https://a.org/x", "First", "snippet one"),
            SearchResult::new("https://b.org/y", "Second", "snippet two"),
        ]);
        let formatted = format_sources_for_prompt(&sources);
        assert!(formatted.contains("[1] First (https://a.org/x)"));
        assert!(formatted.contains("[2] Second (https://b.org/y)"));
    }

    #[test]
    fn test_section_prompt_carries_guidance_and_budget() {
        let registry = Registry::builtin();
        let profile = registry.get("tech_news").unwrap();
        let section = &profile.sections[2];
        let mut context = TopicContext::default();
        context.0.insert("angle".into(), "open hardware".into());
        let prompt = build_section_prompt(
            "some topic",
            &context,
            profile,
            section,
            420,
            "notes here",
            &[],
        );
        assert!(prompt.contains("the_story"));
        assert!(prompt.contains(&section.guidance));
        assert!(prompt.contains("about 420 words"));
        assert!(prompt.contains("angle: open hardware"));
    }

    #[test]
    fn test_edit_prompt_fact_check_flag() {
        let registry = Registry::builtin();
        let profile = registry.get("tech_news").unwrap();
        let section = ArticleSection {
            name: "opening".into(),
            ordinal: 1,
            body: "Some text.".into(),
        };
        let with = build_edit_prompt("t", profile, &section, None, None, "notes", true);
        let without = build_edit_prompt("t", profile, &section, None, None, "notes", false);
        assert!(with.contains("FLAG:"));
        assert!(!without.contains("FLAG:"));
    }

    #[test]
    fn test_humanize_pass_sequence() {
        assert_eq!(HumanizePass::for_index(0), HumanizePass::Variation);
        assert_eq!(HumanizePass::for_index(1), HumanizePass::PhraseRemoval);
        assert_eq!(HumanizePass::for_index(2), HumanizePass::Polish);
        assert_eq!(HumanizePass::for_index(9), HumanizePass::Polish);
    }

    #[test]
    fn test_humanize_prompt_lists_detected_phrases() {
        let body = "Furthermore, the work continued. In conclusion, it ended.";
        let metrics = sentence_variation(body);
        let prompt =
            build_humanize_prompt(body, HumanizePass::PhraseRemoval, Intensity::Medium, &metrics);
        assert!(prompt.contains("\"furthermore\" (1x)"));
        assert!(prompt.contains("\"in conclusion\" (1x)"));
    }
}
