//! # pdfmark
//!
//! Reconstructs readable Markdown from the positioned text fragments and
//! tables a PDF library extracts.
//!
//! The pipeline restores reading order in multi-column layouts, drops
//! repeated running headers and footers, cleans up typographic artifacts,
//! promotes heading lines, renders tables and optionally splits the result
//! into size-bounded chunks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfmark::{Config, Pdfmark};
//!
//! fn main() -> pdfmark::Result<()> {
//!     let config = pdfmark::get_preset("detailed")?;
//!     let report = Pdfmark::new(config)?
//!         .with_output_dir("output/markdown")
//!         .convert_file("report.pdf")?;
//!     println!("{} pages -> {}", report.pages, report.outputs[0].display());
//!     Ok(())
//! }
//! ```
//!
//! Pre-extracted fragments can be converted without touching a PDF:
//!
//! ```
//! use pdfmark::{convert_source, Config, RawDocument, RawPage};
//!
//! let raw = RawDocument::new(vec![
//!     RawPage::new(612.0, 792.0).with_fragment("Hello", [72.0, 72.0, 200.0, 90.0]),
//! ]);
//! let conversion = convert_source(&raw, &Config::default()).unwrap();
//! assert_eq!(conversion.markdown, "Hello\n");
//! ```
//!
//! ## Features
//!
//! - **Reading order**: column clustering over fragment positions
//! - **Running headers/footers**: repeated margin text is detected and skipped
//! - **Text cleanup**: ligatures, typographic quotes, hyphenated line breaks
//! - **Tables**: pipe tables with aligned columns
//! - **Chunking**: lossless splitting at paragraph boundaries
//! - **Parallel processing**: pages are ordered with Rayon

pub mod cache;
pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod output;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use cache::{bytes_hash, file_hash, ExtractionCache};
pub use config::{get_preset, list_presets, Config, PRESET_NAMES};
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, is_pdf, validate_pdf, PdfFormat,
};
pub use diagnostics::{CollectingSink, DiagnosticSink, LogSink};
pub use error::{Error, Result};
pub use extract::{extract, CancelToken, ExtractOptions, Extractor};
pub use model::{BoundingBox, Document, Page, Row, Table, TextFragment};
pub use output::{OutputWriter, INDEX_FILE};
pub use render::{AssemblyStats, Conversion, DocumentAssembler, IndexEntry, MarkdownOptions};
#[cfg(feature = "lopdf-backend")]
pub use source::LopdfSource;
pub use source::{PageSource, RawDocument, RawFragment, RawPage};

use std::fs;
use std::path::{Path, PathBuf};

/// Default directory for Markdown output.
pub const DEFAULT_OUTPUT_DIR: &str = "output/markdown";

/// Default directory for cached extractions.
pub const DEFAULT_CACHE_DIR: &str = "output/raw";

/// Extract and assemble a page source with the given configuration.
///
/// # Example
///
/// ```
/// use pdfmark::{convert_source, Config, RawDocument};
///
/// let conversion = convert_source(&RawDocument::default(), &Config::default()).unwrap();
/// assert_eq!(conversion.markdown, "\n");
/// ```
pub fn convert_source(source: &dyn PageSource, config: &Config) -> Result<Conversion> {
    config.validate()?;
    let doc = extract(source, &config.extract_options(), &LogSink, None)?;
    Ok(render::to_markdown(&doc, &config.markdown_options()?))
}

/// Convert a PDF file to Markdown in memory, without cache or output files.
///
/// # Example
///
/// ```no_run
/// use pdfmark::{to_markdown, Config};
///
/// let markdown = to_markdown("document.pdf", &Config::default()).unwrap();
/// println!("{}", markdown);
/// ```
#[cfg(feature = "lopdf-backend")]
pub fn to_markdown<P: AsRef<Path>>(path: P, config: &Config) -> Result<String> {
    validate_pdf(&path)?;
    let source = LopdfSource::open(path)?;
    Ok(convert_source(&source, config)?.markdown)
}

/// Collect the `*.pdf` files directly inside `dir`, sorted by path.
///
/// Returns [`Error::NoPdfsFound`] when there are none.
pub fn pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NoPdfsFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf_name = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf_name && path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::NoPdfsFound(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// Outcome of converting one file.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// The source PDF
    pub source: PathBuf,
    /// Written files, full Markdown first
    pub outputs: Vec<PathBuf>,
    /// The extraction came from the cache
    pub from_cache: bool,
    pub pages: u32,
    pub tables: u32,
    /// Summary used for `INDEX.md`
    pub entry: IndexEntry,
    pub stats: AssemblyStats,
}

/// Outcome of converting a directory.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConversionReport>,
    pub failed: Vec<(PathBuf, Error)>,
    /// Path of `INDEX.md`, when one was written
    pub index: Option<PathBuf>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Builder-style converter holding configuration, cache and output location.
///
/// # Example
///
/// ```no_run
/// use pdfmark::{Config, Pdfmark};
///
/// let batch = Pdfmark::new(Config::default())
///     .unwrap()
///     .without_cache()
///     .convert_dir("input/pdfs")
///     .unwrap();
/// println!("{} converted, {} failed", batch.converted.len(), batch.failed.len());
/// ```
pub struct Pdfmark {
    config: Config,
    extract_options: ExtractOptions,
    markdown_options: MarkdownOptions,
    cache: Option<ExtractionCache>,
    writer: OutputWriter,
    sink: Box<dyn DiagnosticSink>,
    cancel: Option<CancelToken>,
}

impl Pdfmark {
    /// Validate `config` and build a converter with the default directories.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extract_options: config.extract_options(),
            markdown_options: config.markdown_options()?,
            config,
            cache: Some(ExtractionCache::new(DEFAULT_CACHE_DIR)),
            writer: OutputWriter::new(DEFAULT_OUTPUT_DIR),
            sink: Box::new(LogSink),
            cancel: None,
        })
    }

    /// Store extractions under `dir`.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache = Some(ExtractionCache::new(dir));
        self
    }

    /// Always extract, never read or write the cache.
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Write Markdown into `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.writer = OutputWriter::new(dir);
        self
    }

    /// Report diagnostics to `sink` instead of the `log` facade.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Check `token` between pages.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Disable parallel page ordering.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache.as_ref().map(ExtractionCache::dir)
    }

    /// Extract and assemble a page source, writing `<stem>.md` and chunks.
    pub fn convert_source(&self, source: &dyn PageSource, stem: &str) -> Result<Vec<PathBuf>> {
        let doc = self.extract_source(source)?;
        let conversion = self.assemble(&doc)?;
        self.writer.write(stem, &conversion)
    }

    /// Convert one PDF: validate, consult the cache, extract, assemble and
    /// write the outputs.
    #[cfg(feature = "lopdf-backend")]
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConversionReport> {
        let path = path.as_ref();
        let file_name = display_name(path);
        self.sink.info(&format!("Processing: {}", file_name));

        validate_pdf(path)?;

        let hash = file_hash(path)?;
        let cached = match &self.cache {
            Some(cache) => cache.load(&hash, &*self.sink)?,
            None => None,
        };
        let from_cache = cached.is_some();

        let doc = match cached {
            Some(doc) => {
                self.sink.info("Using cached extraction");
                doc
            }
            None => {
                let source = LopdfSource::open(path)?;
                let doc = self.extract_source(&source)?;
                if let Some(cache) = &self.cache {
                    cache.store(&hash, &doc)?;
                }
                doc
            }
        };

        let conversion = self.assemble(&doc)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        let outputs = self.writer.write(&stem, &conversion)?;

        Ok(ConversionReport {
            source: path.to_path_buf(),
            outputs,
            from_cache,
            pages: doc.total_pages,
            tables: doc.tables,
            entry: IndexEntry::from_document(file_name, &doc),
            stats: conversion.stats,
        })
    }

    /// Convert every PDF in `dir`, in path order.
    ///
    /// A failing file is recorded in the report and does not stop the
    /// batch; cancellation does. `INDEX.md` is written when
    /// `output.create_index` is set and at least one file converted.
    #[cfg(feature = "lopdf-backend")]
    pub fn convert_dir<P: AsRef<Path>>(&self, dir: P) -> Result<BatchReport> {
        let files = pdf_files(dir)?;
        self.sink.info(&format!("Found {} PDF files", files.len()));

        let mut report = BatchReport::default();
        for path in files {
            match self.convert_file(&path) {
                Ok(converted) => report.converted.push(converted),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    self.sink
                        .error(&format!("Failed to process {}: {}", path.display(), e));
                    report.failed.push((path, e));
                }
            }
        }

        report.index = self.finish_batch(&report.converted)?;
        Ok(report)
    }

    /// Write `INDEX.md` for `converted` when the configuration asks for it.
    pub fn finish_batch(&self, converted: &[ConversionReport]) -> Result<Option<PathBuf>> {
        if !self.config.output.create_index || converted.is_empty() {
            return Ok(None);
        }
        let entries: Vec<IndexEntry> = converted.iter().map(|r| r.entry.clone()).collect();
        self.writer.write_index(&entries).map(Some)
    }

    fn extract_source(&self, source: &dyn PageSource) -> Result<Document> {
        Extractor::new(&self.extract_options, &*self.sink)
            .with_cancel(self.cancel.as_ref())
            .extract(source)
    }

    fn assemble(&self, doc: &Document) -> Result<Conversion> {
        DocumentAssembler::new(&self.markdown_options)
            .assemble_cancellable(doc, self.cancel.as_ref())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
