//! Ready-made configurations for common documents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{
    Config, ExtractionConfig, FormattingMarker, LoggingConfig, MarkdownConfig, OutputConfig,
    TextCleaning,
};
use crate::error::{Error, Result};

/// Preset names in registry order.
pub const PRESET_NAMES: [&str; 3] = ["simple", "detailed", "tables"];

const PRESET_DESCRIPTIONS: [(&str, &str); 3] = [
    (
        "simple",
        "Fast extraction with minimal processing (best for simple PDFs)",
    ),
    (
        "detailed",
        "Full-featured extraction with tables and header/footer removal (recommended)",
    ),
    (
        "tables",
        "Focused on table extraction (best for spreadsheets and forms)",
    ),
];

const LOG_FILE: &str = "logs/extraction.log";

/// Preset names with their descriptions, in registry order.
pub fn list_presets() -> Vec<(&'static str, &'static str)> {
    PRESET_DESCRIPTIONS.to_vec()
}

/// Look up a preset by name (case-insensitive).
pub fn get_preset(name: &str) -> Result<Config> {
    match name.to_ascii_lowercase().as_str() {
        "simple" => Ok(simple()),
        "detailed" => Ok(detailed()),
        "tables" => Ok(tables()),
        _ => Err(Error::UnknownPreset {
            name: name.to_string(),
            available: PRESET_NAMES.join(", "),
        }),
    }
}

fn table_settings(strategy: &str, strict_counts: bool) -> BTreeMap<String, serde_yaml::Value> {
    let mut settings = BTreeMap::new();
    settings.insert("vertical_strategy".to_string(), strategy.into());
    settings.insert("horizontal_strategy".to_string(), strategy.into());
    if strict_counts {
        settings.insert("edge_min_length".to_string(), serde_yaml::Value::from(3_i64));
        settings.insert("min_words_horizontal".to_string(), serde_yaml::Value::from(1_i64));
        settings.insert("min_words_vertical".to_string(), serde_yaml::Value::from(1_i64));
    }
    settings
}

fn logging(level: &str) -> LoggingConfig {
    LoggingConfig {
        level: level.to_string(),
        file: Some(PathBuf::from(LOG_FILE)),
    }
}

/// Clean single-column PDFs: no reordering, no detection, markers kept.
fn simple() -> Config {
    Config {
        extraction: ExtractionConfig {
            min_text_length: 10,
            sort_blocks: false,
            detect_headers_footers: false,
            table_settings: table_settings("lines", false),
            ..ExtractionConfig::default()
        },
        markdown: MarkdownConfig {
            preserve_formatting: vec![
                FormattingMarker::Bold,
                FormattingMarker::Italic,
                FormattingMarker::Lists,
            ],
            text_cleaning: TextCleaning {
                render_tables: false,
                remove_headers: false,
                remove_footers: false,
                ..TextCleaning::default()
            },
            ..MarkdownConfig::default()
        },
        output: OutputConfig::default(),
        logging: logging("WARNING"),
    }
}

/// Multi-column documents with chapters, tables and running headers.
fn detailed() -> Config {
    Config {
        extraction: ExtractionConfig {
            min_text_length: 10,
            table_settings: table_settings("lines", true),
            ..ExtractionConfig::default()
        },
        markdown: MarkdownConfig {
            chapter_patterns: vec![r"^CHAPTER\s+\d+".to_string(), r"^Chapter\s+\d+".to_string()],
            section_patterns: vec![r"^[A-Z][A-Z\s]+$".to_string()],
            preserve_formatting: vec![
                FormattingMarker::Bold,
                FormattingMarker::Italic,
                FormattingMarker::Lists,
            ],
            text_cleaning: TextCleaning::default(),
        },
        output: OutputConfig {
            chunk_size_kb: 500,
            create_index: true,
        },
        logging: logging("INFO"),
    }
}

/// Spreadsheets and forms.
fn tables() -> Config {
    Config {
        extraction: ExtractionConfig {
            min_text_length: 5,
            table_settings: table_settings("lines_strict", true),
            ..ExtractionConfig::default()
        },
        markdown: MarkdownConfig {
            text_cleaning: TextCleaning {
                dehyphenate: false,
                ..TextCleaning::default()
            },
            ..MarkdownConfig::default()
        },
        output: OutputConfig::default(),
        logging: logging("INFO"),
    }
}
