use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;

/// One template entry: a named section with a relative word-budget weight
/// and guidance text for the writer prompt
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub guidance: String,
}

fn default_weight() -> u32 {
    3
}

/// Tone guideline for a media type
#[derive(Debug, Clone, Deserialize)]
pub struct Tone {
    /// What kind of publication this reads like
    pub description: String,
    /// Voice instruction, e.g. "measured and precise"
    pub voice: String,
    #[serde(default)]
    pub style_guide: Vec<String>,
}

/// Template + tone for one media type
#[derive(Debug, Clone, Deserialize)]
pub struct MediaProfile {
    pub tone: Tone,
    pub sections: Vec<SectionSpec>,
}

impl MediaProfile {
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn weight_sum(&self) -> u32 {
        self.sections.iter().map(|s| s.weight).sum::<u32>().max(1)
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    media_types: BTreeMap<String, MediaProfile>,
}

/// Read-only media-type registry. Lookup is keyed by the media-type
/// string; unknown keys fail with `UnknownMediaType` — there is no
/// fallback to a default style.
#[derive(Debug, Clone)]
pub struct Registry {
    profiles: BTreeMap<String, MediaProfile>,
}

impl Registry {
    pub fn get(&self, media_type: &str) -> Result<&MediaProfile, PipelineError> {
        self.profiles
            .get(media_type)
            .ok_or_else(|| PipelineError::UnknownMediaType(media_type.to_string()))
    }

    pub fn contains(&self, media_type: &str) -> bool {
        self.profiles.contains_key(media_type)
    }

    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Load profiles from a TOML file, replacing the built-ins
    pub fn from_toml_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PipelineError> {
        let file: RegistryFile = toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("invalid registry file: {e}")))?;
        if file.media_types.is_empty() {
            return Err(PipelineError::Config(
                "registry file defines no media types".to_string(),
            ));
        }
        Ok(Self {
            profiles: file.media_types,
        })
    }

    /// The four built-in publication profiles
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_PROFILES).expect("built-in registry must parse")
    }
}

const BUILTIN_PROFILES: &str = r#"
[media_types.tech_news.tone]
description = "a technology news outlet"
voice = "energetic, direct, and plain-spoken, written for practitioners"
style_guide = [
    "Lead with what changed and who it affects",
    "Short paragraphs, concrete numbers over adjectives",
    "No marketing language",
]

[[media_types.tech_news.sections]]
name = "headline"
weight = 1
guidance = "A single punchy headline, no period, under 12 words"

[[media_types.tech_news.sections]]
name = "opening"
weight = 3
guidance = "Hook the reader with the concrete change or moment that makes this news"

[[media_types.tech_news.sections]]
name = "the_story"
weight = 5
guidance = "What happened, how it works, and who is behind it"

[[media_types.tech_news.sections]]
name = "why_it_matters"
weight = 3
guidance = "Stakes and consequences for the field and for readers"

[[media_types.tech_news.sections]]
name = "what_next"
weight = 2
guidance = "What to watch for and the realistic near-term trajectory"

[media_types.scientific_journal.tone]
description = "a peer-reviewed scientific journal"
voice = "measured, precise, and formal without being stiff"
style_guide = [
    "Claims follow evidence, never the reverse",
    "Define terms on first use",
    "Prefer the active voice for methods",
]

[[media_types.scientific_journal.sections]]
name = "title"
weight = 1
guidance = "A descriptive title stating the finding"

[[media_types.scientific_journal.sections]]
name = "abstract"
weight = 2
guidance = "Condensed motivation, method, and principal result"

[[media_types.scientific_journal.sections]]
name = "introduction"
weight = 3
guidance = "Problem framing and relation to prior work"

[[media_types.scientific_journal.sections]]
name = "methodology"
weight = 3
guidance = "How the work was carried out, in reproducible terms"

[[media_types.scientific_journal.sections]]
name = "results"
weight = 3
guidance = "What was observed, with magnitudes"

[[media_types.scientific_journal.sections]]
name = "discussion"
weight = 3
guidance = "Interpretation, limitations, and open questions"

[[media_types.scientific_journal.sections]]
name = "conclusion"
weight = 2
guidance = "The takeaway and its scope"

[media_types.research_magazine.tone]
description = "a popular research magazine"
voice = "curious and narrative, translating expertise for a broad audience"
style_guide = [
    "Tell the story of the work, not just the result",
    "Analogies are welcome when they are accurate",
    "People appear by name and motivation",
]

[[media_types.research_magazine.sections]]
name = "headline"
weight = 1
guidance = "An evocative headline that promises a story"

[[media_types.research_magazine.sections]]
name = "lead"
weight = 3
guidance = "A scene or question that pulls the reader in"

[[media_types.research_magazine.sections]]
name = "background"
weight = 3
guidance = "The state of the field before this work"

[[media_types.research_magazine.sections]]
name = "discovery"
weight = 4
guidance = "The finding itself and the path to it"

[[media_types.research_magazine.sections]]
name = "impact"
weight = 3
guidance = "What changes now that this is known"

[[media_types.research_magazine.sections]]
name = "future"
weight = 2
guidance = "Where the work goes from here"

[media_types.academic_news.tone]
description = "a university news service"
voice = "warm but factual, celebrating the work without inflating it"
style_guide = [
    "Attribute achievements to the people involved",
    "Institutional context matters",
    "Quote-ready sentences, no jargon walls",
]

[[media_types.academic_news.sections]]
name = "headline"
weight = 1
guidance = "A clear headline naming the achievement"

[[media_types.academic_news.sections]]
name = "opening"
weight = 3
guidance = "The announcement and why it is notable"

[[media_types.academic_news.sections]]
name = "achievement"
weight = 4
guidance = "The substance of the work in accessible terms"

[[media_types.academic_news.sections]]
name = "context"
weight = 3
guidance = "How the work fits the wider research landscape"

[[media_types.academic_news.sections]]
name = "recognition"
weight = 2
guidance = "Reception, collaborators, and what the recognition means"
"#;
