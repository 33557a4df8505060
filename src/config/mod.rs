//! Configuration file support.
//!
//! The configuration is a YAML document with four sections. Every key is
//! optional and unknown keys are ignored:
//!
//! ```yaml
//! extraction:
//!   min_text_length: 10
//!   sort_blocks: true
//!   column_threshold: 0.3
//!   detect_headers_footers: true
//!   header_footer_margin: 0.1
//! markdown:
//!   chapter_patterns: ['^CHAPTER\s+\d+']
//!   section_patterns: ['^[A-Z][A-Z\s]+$']
//!   preserve_formatting: [bold, italic, lists]
//!   text_cleaning:
//!     dehyphenate: true
//! output:
//!   chunk_size_kb: 500
//!   create_index: true
//! logging:
//!   level: INFO
//!   file: logs/extraction.log
//! ```

mod presets;

pub use presets::{get_preset, list_presets, PRESET_NAMES};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::ExtractOptions;
use crate::render::{FormattingOptions, HeadingClassifier, MarkdownOptions, NormalizeOptions};

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub markdown: MarkdownConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// `extraction` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub min_text_length: usize,
    pub sort_blocks: bool,
    pub column_threshold: f32,
    pub detect_headers_footers: bool,
    pub header_footer_margin: f32,
    pub block_indicators: Vec<String>,
    /// Passed through to table-detecting page sources
    pub table_settings: BTreeMap<String, serde_yaml::Value>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 0,
            sort_blocks: true,
            column_threshold: 0.3,
            detect_headers_footers: true,
            header_footer_margin: 0.1,
            block_indicators: Vec::new(),
            table_settings: BTreeMap::new(),
        }
    }
}

/// `markdown` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub chapter_patterns: Vec<String>,
    pub section_patterns: Vec<String>,
    pub preserve_formatting: Vec<FormattingMarker>,
    pub text_cleaning: TextCleaning,
}

/// A formatting marker that can be preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormattingMarker {
    Bold,
    Italic,
    Lists,
}

/// `markdown.text_cleaning` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextCleaning {
    pub normalize_unicode: bool,
    pub normalize_whitespace: bool,
    pub dehyphenate: bool,
    pub normalize_quotes: bool,
    pub render_tables: bool,
    pub remove_headers: bool,
    pub remove_footers: bool,
}

impl Default for TextCleaning {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            normalize_whitespace: true,
            dehyphenate: true,
            normalize_quotes: true,
            render_tables: true,
            remove_headers: true,
            remove_footers: true,
        }
    }
}

/// `output` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Chunk limit in KiB (0 = no chunking)
    pub chunk_size_kb: u32,
    /// Write `INDEX.md` after a directory run
    pub create_index: bool,
}

/// `logging` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// DEBUG, INFO, WARNING or ERROR
    pub level: String,
    /// Also write log records to this file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Map the configured level name onto a `log` filter.
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        match self.level.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(log::LevelFilter::Trace),
            "DEBUG" => Ok(log::LevelFilter::Debug),
            "INFO" | "SUCCESS" => Ok(log::LevelFilter::Info),
            "WARNING" | "WARN" => Ok(log::LevelFilter::Warn),
            "ERROR" | "CRITICAL" => Ok(log::LevelFilter::Error),
            "OFF" => Ok(log::LevelFilter::Off),
            other => Err(Error::Config(format!("unknown log level '{}'", other))),
        }
    }
}

impl Config {
    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration file.
    ///
    /// A missing file is not an error: a warning is logged and the defaults
    /// are returned. A malformed file is [`Error::Yaml`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(data) => Self::from_yaml_str(&data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Config file not found: {}. Using defaults.", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check ranges, log level and heading patterns.
    pub fn validate(&self) -> Result<()> {
        check_fraction("extraction.column_threshold", self.extraction.column_threshold)?;
        check_fraction(
            "extraction.header_footer_margin",
            self.extraction.header_footer_margin,
        )?;
        self.logging.level_filter()?;
        self.heading_classifier()?;
        Ok(())
    }

    /// Options for the extraction phase.
    pub fn extract_options(&self) -> ExtractOptions {
        let e = &self.extraction;
        ExtractOptions {
            min_text_length: e.min_text_length,
            sort_blocks: e.sort_blocks,
            column_threshold: e.column_threshold,
            detect_headers_footers: e.detect_headers_footers,
            header_footer_margin: e.header_footer_margin,
            block_indicators: e.block_indicators.clone(),
            ..ExtractOptions::default()
        }
    }

    /// Options for Markdown assembly, with heading patterns compiled.
    pub fn markdown_options(&self) -> Result<MarkdownOptions> {
        let cleaning = &self.markdown.text_cleaning;
        let preserve = &self.markdown.preserve_formatting;

        Ok(MarkdownOptions {
            normalize: NormalizeOptions {
                normalize_unicode: cleaning.normalize_unicode,
                normalize_quotes: cleaning.normalize_quotes,
                dehyphenate: cleaning.dehyphenate,
                normalize_whitespace: cleaning.normalize_whitespace,
            },
            formatting: FormattingOptions {
                bold: preserve.contains(&FormattingMarker::Bold),
                italic: preserve.contains(&FormattingMarker::Italic),
                lists: preserve.contains(&FormattingMarker::Lists),
            },
            headings: self.heading_classifier()?,
            render_tables: cleaning.render_tables,
            remove_headers: cleaning.remove_headers,
            remove_footers: cleaning.remove_footers,
            chunk_size_kb: self.output.chunk_size_kb,
        })
    }

    fn heading_classifier(&self) -> Result<HeadingClassifier> {
        HeadingClassifier::new(
            &self.markdown.chapter_patterns,
            &self.markdown.section_patterns,
        )
    }
}

fn check_fraction(key: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be between 0 and 1, got {}",
            key, value
        )))
    }
}
