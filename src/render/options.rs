//! Assembly options.

use super::{FormattingOptions, HeadingClassifier, NormalizeOptions};

/// Options consumed by the [`DocumentAssembler`](super::DocumentAssembler).
///
/// Heading patterns arrive already compiled; see
/// [`Config::markdown_options`](crate::Config::markdown_options).
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Text normalization toggles
    pub normalize: NormalizeOptions,

    /// Which inline markers survive
    pub formatting: FormattingOptions,

    /// Chapter and section patterns
    pub headings: HeadingClassifier,

    /// Render page tables as Markdown grids
    pub render_tables: bool,

    /// Skip fragments flagged as running headers
    pub remove_headers: bool,

    /// Skip fragments flagged as running footers
    pub remove_footers: bool,

    /// Chunk size limit in KiB (0 = single chunk)
    pub chunk_size_kb: u32,
}

impl MarkdownOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalization toggles.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the formatting markers to preserve.
    pub fn with_formatting(mut self, formatting: FormattingOptions) -> Self {
        self.formatting = formatting;
        self
    }

    /// Set the heading classifier.
    pub fn with_headings(mut self, headings: HeadingClassifier) -> Self {
        self.headings = headings;
        self
    }

    /// Enable or disable table rendering.
    pub fn with_tables(mut self, render: bool) -> Self {
        self.render_tables = render;
        self
    }

    /// Enable or disable skipping of running headers and footers.
    pub fn with_margin_removal(mut self, headers: bool, footers: bool) -> Self {
        self.remove_headers = headers;
        self.remove_footers = footers;
        self
    }

    /// Set the chunk size limit in KiB.
    pub fn with_chunk_size_kb(mut self, kb: u32) -> Self {
        self.chunk_size_kb = kb;
        self
    }

    /// Chunk limit in bytes.
    pub fn chunk_limit_bytes(&self) -> usize {
        self.chunk_size_kb as usize * 1024
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::all(),
            formatting: FormattingOptions::default(),
            headings: HeadingClassifier::default(),
            render_tables: true,
            remove_headers: true,
            remove_footers: true,
            chunk_size_kb: 0,
        }
    }
}
