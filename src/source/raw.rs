//! Pre-extracted page content loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PageSource, RawPage};
use crate::error::{Error, Result};

/// A document already broken into raw pages.
///
/// Lets any external extractor hand its output to the pipeline as JSON:
///
/// ```json
/// {"pages": [{"width": 612, "height": 792,
///             "fragments": [{"text": "Hello", "bbox": [72, 72, 140, 86]}],
///             "tables": [[["Name", "Age"], ["Alice", "30"]]]}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub pages: Vec<RawPage>,
}

impl RawDocument {
    pub fn new(pages: Vec<RawPage>) -> Self {
        Self { pages }
    }

    /// Parse a JSON description.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON description from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl PageSource for RawDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<RawPage> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Other(format!("page index {} out of range", index)))
    }
}
