//! Page sources: the boundary with PDF parsing.
//!
//! A [`PageSource`] yields, per page, the page size, raw text fragments with
//! optional bounding boxes, and raw table grids. Everything downstream works
//! on these values only.

#[cfg(feature = "lopdf-backend")]
mod pdf;
mod raw;

#[cfg(feature = "lopdf-backend")]
pub use pdf::LopdfSource;
pub use raw::RawDocument;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Table;

/// Supplier of raw per-page content.
pub trait PageSource {
    /// Number of pages in the source.
    fn page_count(&self) -> usize;

    /// Raw content of the page at `index` (0-based).
    fn page(&self, index: usize) -> Result<RawPage>;
}

/// Unprocessed content of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page width in user-space units
    #[serde(default)]
    pub width: f32,

    /// Page height, when known
    #[serde(default)]
    pub height: Option<f32>,

    /// Fragments in extraction order
    #[serde(default)]
    pub fragments: Vec<RawFragment>,

    /// Table grids in extraction order
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl RawPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height: Some(height),
            ..Default::default()
        }
    }

    /// Add a positioned fragment (`[x0, y0, x1, y1]`, top-left origin).
    pub fn with_fragment(mut self, text: impl Into<String>, bbox: [f32; 4]) -> Self {
        self.fragments.push(RawFragment {
            text: text.into(),
            bbox: Some(bbox),
        });
        self
    }

    /// Add a table grid.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }
}

/// A text fragment as reported by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    pub text: String,

    /// `[x0, y0, x1, y1]` with a top-left origin, if the parser knows it
    #[serde(default)]
    pub bbox: Option<[f32; 4]>,
}
