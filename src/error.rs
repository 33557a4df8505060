//! Error types for pdfmark.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting and converting documents.
///
/// The layout and rendering algorithms never fail; these errors come from
/// configuration, file access and the PDF collaborator.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The file at the given path is not a readable PDF.
    #[error("Not a valid PDF file: {}", .0.display())]
    InvalidPdf(PathBuf),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The requested preset does not exist.
    #[error("Unknown preset '{name}'. Available presets: {available}")]
    UnknownPreset {
        /// Requested name
        name: String,
        /// Comma-separated list of known presets
        available: String,
    },

    /// A heading pattern failed to compile.
    #[error("Invalid heading pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Malformed YAML configuration.
    #[error("Configuration format error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON (cache entries, raw documents).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Processing was cancelled between pages.
    #[error("Extraction cancelled")]
    Cancelled,

    /// No PDF files were found in a directory.
    #[error("No PDF files found in: {}", .0.display())]
    NoPdfsFound(PathBuf),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "lopdf-backend")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
