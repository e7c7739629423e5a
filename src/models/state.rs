use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The failable stages of a run, used to tag `PipelineError::Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Research,
    Write,
    Edit,
    Humanize,
    Format,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Research => "research",
            Stage::Write => "write",
            Stage::Edit => "edit",
            Stage::Humanize => "humanize",
            Stage::Format => "format",
        };
        f.write_str(name)
    }
}

/// Progression of a single pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Created,
    Researching,
    Writing,
    Editing,
    Humanizing,
    Formatting,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Created => "created",
            PipelineStage::Researching => "researching",
            PipelineStage::Writing => "writing",
            PipelineStage::Editing => "editing",
            PipelineStage::Humanizing => "humanizing",
            PipelineStage::Formatting => "formatting",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Target article length, mapped to a total word budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    Medium,
    Long,
}

impl Length {
    /// Total word target split proportionally across sections by the writer
    pub fn target_words(&self) -> u32 {
        match self {
            Length::Short => 650,
            Length::Medium => 1200,
            Length::Long => 2200,
        }
    }
}

impl FromStr for Length {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Length::Short),
            "medium" => Ok(Length::Medium),
            "long" => Ok(Length::Long),
            other => Err(format!(
                "invalid length '{other}' (expected short, medium, or long)"
            )),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        };
        f.write_str(name)
    }
}

/// Rewrite strength for the humanizer stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Instruction fragment injected into humanizer prompts
    pub fn instruction(&self) -> &'static str {
        match self {
            Intensity::Low => {
                "Make subtle improvements while preserving most of the original structure."
            }
            Intensity::Medium => {
                "Make noticeable improvements to naturalness while keeping the core content intact."
            }
            Intensity::High => {
                "Aggressively rework the text to sound completely human-written, restructuring \
                 sentences and paragraphs where needed."
            }
        }
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            other => Err(format!(
                "invalid intensity '{other}' (expected low, medium, or high)"
            )),
        }
    }
}

/// Caller-supplied notes about the topic, threaded into every prompt.
/// Keys are free-form ("novel_aspect", "problem_solved", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContext(pub BTreeMap<String, String>);

impl TopicContext {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as "key: value" lines for prompt inclusion
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}: {}", k.replace('_', " "), v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Immutable request context threaded through the stages. Stage outputs
/// (research data, the article) flow between stages explicitly rather
/// than accumulating here.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub topic: String,
    pub context: TopicContext,
    pub media_type: String,
    pub length: Length,
}

impl PipelineState {
    pub fn new(topic: String, context: TopicContext, media_type: String, length: Length) -> Self {
        Self {
            topic,
            context,
            media_type,
            length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_parsing_and_targets() {
        assert_eq!("short".parse::<Length>().unwrap(), Length::Short);
        assert_eq!("long".parse::<Length>().unwrap(), Length::Long);
        assert!("epic".parse::<Length>().is_err());
        assert!(Length::Short.target_words() < Length::Medium.target_words());
        assert!(Length::Medium.target_words() < Length::Long.target_words());
    }

    #[test]
    fn test_context_render() {
        let mut ctx = TopicContext::default();
        ctx.0
            .insert("novel_aspect".into(), "on-device inference".into());
        ctx.0.insert("use_cases".into(), "field robotics".into());
        let rendered = ctx.render();
        assert!(rendered.contains("novel aspect: on-device inference"));
        assert!(rendered.contains("use cases: field robotics"));
    }
}
