use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One article section. The name and ordinal come from the media-type
/// template and never change after the writer produces the section;
/// later stages replace the body only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSection {
    pub name: String,
    pub ordinal: usize,
    pub body: String,
}

/// A finished (or in-progress) article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub date: NaiveDate,
    pub media_type: String,
    pub topic: String,
    pub sections: Vec<ArticleSection>,
}

impl Article {
    pub fn section(&self, name: &str) -> Option<&ArticleSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Total body word count across all sections
    pub fn word_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.body.split_whitespace().count())
            .sum()
    }

    /// Section names in ordinal order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }
}
