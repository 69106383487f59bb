//! Story catalog — loading, ordering and validation of themed stories.

use rustc_hash::FxHashSet;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::schema::story::{Story, Theme};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("catalog contains no themes")]
    NoThemes,
    #[error("theme '{0}' appears more than once")]
    DuplicateTheme(String),
    #[error("theme '{0}' has no stories")]
    EmptyTheme(String),
    #[error(
        "story '{title}' in theme '{theme}' has {blanks} blanks but {placeholders} placeholders"
    )]
    BlankMismatch {
        theme: String,
        title: String,
        blanks: usize,
        placeholders: usize,
    },
}

/// A parsed but unchecked catalog document.
///
/// Themes keep the order they have in the source document, which is the
/// order the theme menu shows them in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogDocument {
    #[serde(deserialize_with = "ordered_themes")]
    pub themes: Vec<Theme>,
}

// The document maps theme names to `{ stories: [...] }`; this is the value side.
#[derive(Debug, Deserialize)]
#[serde(rename = "Theme")]
struct ThemeEntry {
    stories: Vec<Story>,
}

fn ordered_themes<'de, D>(deserializer: D) -> Result<Vec<Theme>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ThemesVisitor;

    impl<'de> Visitor<'de> for ThemesVisitor {
        type Value = Vec<Theme>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of theme names to stories")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut themes = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, entry)) = map.next_entry::<String, ThemeEntry>()? {
                themes.push(Theme {
                    name,
                    stories: entry.stories,
                });
            }
            Ok(themes)
        }
    }

    deserializer.deserialize_map(ThemesVisitor)
}

impl CatalogDocument {
    /// Read a document from disk. `.ron` files are parsed as RON,
    /// everything else as JSON.
    pub fn load(path: &Path) -> Result<CatalogDocument, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("ron") => Self::parse_ron(&contents),
            _ => Self::parse_json(&contents),
        }
    }

    pub fn parse_json(input: &str) -> Result<CatalogDocument, CatalogError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn parse_ron(input: &str) -> Result<CatalogDocument, CatalogError> {
        Ok(ron::from_str(input)?)
    }
}

/// A validated, read-only story catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    themes: Vec<Theme>,
}

impl Catalog {
    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let catalog = Self::from_document(CatalogDocument::load(path)?)?;
        tracing::info!(
            path = %path.display(),
            themes = catalog.len(),
            stories = catalog.story_count(),
            "loaded story catalog"
        );
        Ok(catalog)
    }

    /// Validate a parsed document. Fails on the first structural problem.
    pub fn from_document(doc: CatalogDocument) -> Result<Catalog, CatalogError> {
        if let Some(err) = structural_errors(&doc.themes).into_iter().next() {
            return Err(err);
        }
        Ok(Catalog { themes: doc.themes })
    }

    pub fn from_themes(themes: Vec<Theme>) -> Result<Catalog, CatalogError> {
        Self::from_document(CatalogDocument { themes })
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Theme at a zero-based menu position.
    pub fn theme(&self, index: usize) -> Option<&Theme> {
        self.themes.get(index)
    }

    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn story_count(&self) -> usize {
        self.themes.iter().map(|t| t.stories.len()).sum()
    }
}

/// Every problem that makes a set of themes unplayable.
pub fn structural_errors(themes: &[Theme]) -> Vec<CatalogError> {
    let mut errors = Vec::new();

    if themes.is_empty() {
        errors.push(CatalogError::NoThemes);
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for theme in themes {
        if !seen.insert(theme.name.as_str()) {
            errors.push(CatalogError::DuplicateTheme(theme.name.clone()));
        }
        if theme.stories.is_empty() {
            errors.push(CatalogError::EmptyTheme(theme.name.clone()));
        }
        for story in &theme.stories {
            let blanks = story.blank_count();
            if blanks != story.placeholders.len() {
                errors.push(CatalogError::BlankMismatch {
                    theme: theme.name.clone(),
                    title: story.title.clone(),
                    blanks,
                    placeholders: story.placeholders.len(),
                });
            }
        }
    }

    errors
}

/// Result of linting a catalog document.
#[derive(Debug, Default)]
pub struct LintReport {
    pub errors: Vec<CatalogError>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Structural errors plus quality warnings that do not stop a game:
/// stories without blanks, repeated titles, blank prompts and titles
/// wider than `width`.
pub fn lint(doc: &CatalogDocument, width: usize) -> LintReport {
    let mut warnings = Vec::new();

    for theme in &doc.themes {
        if theme.name.trim().is_empty() {
            warnings.push("a theme has an empty name".to_string());
        }

        let mut titles: FxHashSet<&str> = FxHashSet::default();
        for story in &theme.stories {
            if !titles.insert(story.title.as_str()) {
                warnings.push(format!(
                    "theme '{}' has more than one story titled '{}'",
                    theme.name, story.title
                ));
            }
            if story.blank_count() == 0 {
                warnings.push(format!(
                    "story '{}' in theme '{}' has no blanks",
                    story.title, theme.name
                ));
            }
            if story.title.chars().count() > width {
                warnings.push(format!(
                    "story title '{}' is wider than {} columns",
                    story.title, width
                ));
            }
            for (i, placeholder) in story.placeholders.iter().enumerate() {
                if placeholder.prompt.trim().is_empty() {
                    warnings.push(format!(
                        "story '{}' in theme '{}': placeholder {} has an empty prompt",
                        story.title,
                        theme.name,
                        i + 1
                    ));
                }
            }
        }
    }

    LintReport {
        errors: structural_errors(&doc.themes),
        warnings,
    }
}
