//! Pattern-based heading classification.

use regex::Regex;

use crate::error::{Error, Result};

/// Heading level assigned to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    /// Rendered as `# line`
    Chapter,
    /// Rendered as `## line`
    Section,
}

impl HeadingKind {
    /// Markdown prefix for this heading level.
    pub fn marker(self) -> &'static str {
        match self {
            HeadingKind::Chapter => "#",
            HeadingKind::Section => "##",
        }
    }
}

/// Ordered chapter and section patterns, compiled once.
///
/// Chapter patterns are checked before section patterns and the first
/// match wins. A pattern matches anywhere in the line unless it is anchored.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    chapter: Vec<Regex>,
    section: Vec<Regex>,
}

impl HeadingClassifier {
    /// Compile the pattern lists, failing on the first invalid pattern.
    pub fn new<S: AsRef<str>>(chapter_patterns: &[S], section_patterns: &[S]) -> Result<Self> {
        Ok(Self {
            chapter: compile_all(chapter_patterns)?,
            section: compile_all(section_patterns)?,
        })
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.chapter.is_empty() && self.section.is_empty()
    }

    /// Classify a line.
    pub fn classify(&self, line: &str) -> Option<HeadingKind> {
        if self.chapter.iter().any(|re| re.is_match(line)) {
            Some(HeadingKind::Chapter)
        } else if self.section.iter().any(|re| re.is_match(line)) {
            Some(HeadingKind::Section)
        } else {
            None
        }
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let pattern = p.as_ref();
            Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}
