//! Assembly result with statistics.

use serde::{Deserialize, Serialize};

/// Result of assembling a document into Markdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// The complete Markdown text
    pub markdown: String,

    /// Chunks whose concatenation equals `markdown`
    pub chunks: Vec<String>,

    /// Assembly statistics
    pub stats: AssemblyStats,
}

impl Conversion {
    /// Whether the output was split into more than one chunk.
    pub fn is_chunked(&self) -> bool {
        self.chunks.len() > 1
    }

    /// Get the Markdown length in bytes.
    pub fn content_len(&self) -> usize {
        self.markdown.len()
    }
}

/// Statistics collected while assembling Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Pages processed
    pub page_count: u32,

    /// Fragments that made it into the output
    pub fragments_rendered: u32,

    /// Fragments skipped as running headers or footers
    pub fragments_skipped: u32,

    /// Lines emitted as chapter or section headings
    pub heading_count: u32,

    /// Tables rendered as Markdown
    pub table_count: u32,

    /// Size of the final Markdown in bytes
    pub byte_count: u64,

    /// Number of chunks produced
    pub chunk_count: u32,
}

impl AssemblyStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &AssemblyStats) {
        self.page_count += other.page_count;
        self.fragments_rendered += other.fragments_rendered;
        self.fragments_skipped += other.fragments_skipped;
        self.heading_count += other.heading_count;
        self.table_count += other.table_count;
        self.byte_count += other.byte_count;
        self.chunk_count += other.chunk_count;
    }
}
