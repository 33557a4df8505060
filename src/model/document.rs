//! Document and page types.

use super::{Table, TextFragment};
use serde::{Deserialize, Serialize};

/// Page height assumed when the collaborator did not report a usable one.
pub const DEFAULT_PAGE_HEIGHT: f32 = 800.0;

/// An extracted PDF document.
///
/// Built once per source file in page order; afterwards only the
/// reading-order and header/footer passes touch it, in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in document order
    pub pages: Vec<Page>,

    /// Total number of pages in the source
    pub total_pages: u32,

    /// Number of text fragments kept across all pages
    pub text_fragments: u32,

    /// Number of tables across all pages
    pub tables: u32,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page and fold its contents into the counters.
    pub fn add_page(&mut self, page: Page) {
        self.text_fragments += page.fragments.len() as u32;
        self.tables += page.tables.len() as u32;
        self.pages.push(page);
        self.total_pages = self.total_pages.max(self.pages.len() as u32);
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over every fragment in document order.
    pub fn fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.pages.iter().flat_map(|p| p.fragments.iter())
    }

    /// Get plain text content of the entire document, ignoring layout flags.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A single page in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in PDF user-space units
    pub width: f32,

    /// Page height in PDF user-space units (0 when unknown)
    #[serde(default)]
    pub height: f32,

    /// Text fragments in extraction (later: reading) order
    #[serde(default)]
    pub fragments: Vec<TextFragment>,

    /// Tables in extraction order
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width: sanitize_dimension(width),
            height: sanitize_dimension(height),
            fragments: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a fragment to the page.
    pub fn add_fragment(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Add a table to the page.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Height used for margin zones, falling back to [`DEFAULT_PAGE_HEIGHT`].
    pub fn effective_height(&self) -> f32 {
        if self.height.is_finite() && self.height > 0.0 {
            self.height
        } else {
            DEFAULT_PAGE_HEIGHT
        }
    }

    /// Check if the page has no content.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.tables.is_empty()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
