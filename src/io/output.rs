use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::OutputSettings;
use crate::error::PipelineError;
use crate::models::{Article, SourceSet};

const SNIPPET_PREVIEW_CHARS: usize = 150;
const TOPIC_SLUG_MAX: usize = 50;

/// Render a finished article as markdown with YAML frontmatter, section
/// bodies as flowing prose, and an optional numbered Sources list.
pub fn render_markdown(article: &Article, sources: &SourceSet, include_sources: bool) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("title: \"{}\"\n", article.title.replace('"', "\\\"")));
    out.push_str(&format!("date: {}\n", article.date.format("%Y-%m-%d")));
    out.push_str(&format!("media_type: {}\n", article.media_type));
    out.push_str(&format!("topic: \"{}\"\n", article.topic.replace('"', "\\\"")));
    out.push_str("---\n\n");

    out.push_str(&format!("# {}\n\n", article.title));

    for section in &article.sections {
        // The headline/title section already became the H1
        if matches!(section.name.as_str(), "headline" | "title") {
            continue;
        }
        out.push_str(section.body.trim());
        out.push_str("\n\n");
    }

    if include_sources && !sources.is_empty() {
        out.push_str("## Sources\n\n");
        for (i, source) in sources.iter().enumerate() {
            let title = if source.title.is_empty() {
                &source.url
            } else {
                &source.title
            };
            out.push_str(&format!("{}. [{}]({})\n", i + 1, title, source.url));
            if !source.snippet.is_empty() {
                out.push_str(&format!(
                    "   {}\n",
                    truncate_chars(&source.snippet, SNIPPET_PREVIEW_CHARS)
                ));
            }
        }
    }

    out
}

/// Fill the filename template. `{date}`, `{topic}`, and `{media_type}`
/// are replaced; the topic is slugified and capped so filenames stay
/// portable.
pub fn generate_filename(article: &Article, template: &str) -> String {
    template
        .replace("{date}", &article.date.format("%Y-%m-%d").to_string())
        .replace("{topic}", &slugify(&article.topic))
        .replace("{media_type}", &article.media_type)
}

/// Write the rendered markdown under the output directory, creating it
/// if needed. Returns the path written.
pub fn write_article(
    article: &Article,
    sources: &SourceSet,
    include_sources: bool,
    settings: &OutputSettings,
) -> Result<PathBuf, PipelineError> {
    let markdown = render_markdown(article, sources, include_sources);
    let path = settings
        .directory
        .join(generate_filename(article, &settings.filename_template));
    write_markdown(&markdown, &path)?;
    Ok(path)
}

fn write_markdown(markdown: &str, path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, markdown)?;
    info!(path = %path.display(), bytes = markdown.len(), "article written");
    Ok(())
}

fn slugify(topic: &str) -> String {
    let mut slug: String = topic
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    slug = slug.trim_matches('_').to_string();
    // Collapse runs of underscores from replaced punctuation
    while slug.contains("__") {
        slug = slug.replace("__", "_");
    }
    slug.chars().take(TOPIC_SLUG_MAX).collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{ArticleSection, SearchResult};
    use crate::sources::normalize_sources;

    fn article() -> Article {
        Article {
            title: "Membrane Efficiency Doubles".into(),
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            media_type: "tech_news".into(),
            topic: "Desalination: what's next?".into(),
            sections: vec![
                ArticleSection {
                    name: "headline".into(),
                    ordinal: 0,
                    body: "Membrane Efficiency Doubles".into(),
                },
                ArticleSection {
                    name: "opening".into(),
                    ordinal: 1,
                    body: "The opening paragraph.".into(),
                },
                ArticleSection {
                    name: "the_story".into(),
                    ordinal: 2,
                    body: "The story itself.".into(),
                },
            ],
        }
    }

    fn sources() -> SourceSet {
        normalize_sources(vec![
            SearchResult::new("https://a.org/paper", "The Paper", "a snippet"),
            SearchResult::new("https://b.org/report", "", "another snippet"),
        ])
    }

    #[test]
    fn test_markdown_layout() {
        let md = render_markdown(&article(), &sources(), true);
        assert!(md.starts_with("---\n"));
        assert!(md.contains("title: \"Membrane Efficiency Doubles\""));
        assert!(md.contains("date: 2026-08-30"));
        assert!(md.contains("# Membrane Efficiency Doubles"));
        // Headline section is not repeated as body text
        assert_eq!(md.matches("Membrane Efficiency Doubles").count(), 2);
        assert!(md.contains("The opening paragraph."));
        assert!(md.contains("## Sources"));
        assert!(md.contains("1. [The Paper](https://a.org/paper)"));
        // Untitled sources fall back to their URL
        assert!(md.contains("2. [https://b.org/report](https://b.org/report)"));
    }

    #[test]
    fn test_sources_section_omitted() {
        let md = render_markdown(&article(), &sources(), false);
        assert!(!md.contains("## Sources"));
        let md = render_markdown(&article(), &SourceSet::default(), true);
        assert!(!md.contains("## Sources"));
    }

    #[test]
    fn test_filename_template() {
        let name = generate_filename(&article(), "{date}_{topic}_{media_type}.md");
        assert_eq!(name, "2026-08-30_desalination_what_s_next_tech_news.md");
    }

    #[test]
    fn test_slug_capped() {
        let long = "x".repeat(120);
        assert_eq!(slugify(&long).len(), TOPIC_SLUG_MAX);
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let settings = OutputSettings {
            directory: dir.path().join("nested/articles"),
            filename_template: "{date}.md".to_string(),
        };
        let path = write_article(&article(), &sources(), true, &settings).unwrap();
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Membrane Efficiency Doubles"));
    }

    #[test]
    fn test_snippet_truncated() {
        let long_snippet = "word ".repeat(100);
        let set = normalize_sources(vec![SearchResult::new(
            "https://a.org/x",
            "Long",
            long_snippet,
        )]);
        let md = render_markdown(&article(), &set, true);
        let line = md.lines().find(|l| l.starts_with("   word")).unwrap();
        assert!(line.len() < 170);
        assert!(line.ends_with("..."));
    }
}
