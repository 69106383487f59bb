use serde::{Deserialize, Serialize};

use crate::core::template::{self, TemplateError};

/// A single prompt shown to the player when asking for one blank's value,
/// e.g. "Enter an adjective".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub prompt: String,
}

impl Placeholder {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// A story template: text segments containing blank markers plus one
/// placeholder per blank, in the order the blanks appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    /// Template text, split into segments. Joined with a single space.
    #[serde(rename = "story")]
    pub segments: Vec<String>,
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
}

impl Story {
    /// The full template text: all segments joined by a single space.
    pub fn template(&self) -> String {
        self.segments.join(" ")
    }

    /// Number of blank markers in the joined template.
    pub fn blank_count(&self) -> usize {
        template::count_blanks(&self.template())
    }

    /// Substitute `answers` into the template, first blank to first answer.
    pub fn fill(&self, answers: &[String]) -> Result<String, TemplateError> {
        template::fill(&self.template(), answers)
    }
}

/// A named group of stories, shown as one entry of the theme menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub stories: Vec<Story>,
}
