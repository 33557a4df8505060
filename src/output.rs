//! Writing Markdown, chunk files and the index to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::render::{render_index, Conversion, IndexEntry};

/// File name of the generated index.
pub const INDEX_FILE: &str = "INDEX.md";

/// Writes conversion results into an output directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `<stem>.md`, plus `<stem>_partNNN.md` per chunk when the output
    /// was split. Returns the written paths, full document first.
    pub fn write(&self, stem: &str, conversion: &Conversion) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut written = Vec::with_capacity(conversion.chunks.len() + 1);
        let main = self.dir.join(format!("{stem}.md"));
        fs::write(&main, &conversion.markdown)?;
        written.push(main);

        if conversion.is_chunked() {
            for (i, chunk) in conversion.chunks.iter().enumerate() {
                let path = self.dir.join(format!("{}_part{:03}.md", stem, i + 1));
                fs::write(&path, chunk)?;
                written.push(path);
            }
        }

        log::info!("Saved: {}", written[0].display());
        Ok(written)
    }

    /// Write `INDEX.md` listing the given entries.
    pub fn write_index(&self, entries: &[IndexEntry]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(INDEX_FILE);
        fs::write(&path, render_index(entries))?;
        log::info!("Created index file: {}", path.display());
        Ok(path)
    }
}
