//! Content-addressed cache of extracted documents.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::model::Document;

/// SHA-256 hex digest of a file's contents.
pub fn file_hash<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex(&hasher.finalize()))
}

/// SHA-256 hex digest of in-memory data.
pub fn bytes_hash(data: &[u8]) -> String {
    hex(&Sha256::digest(data))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Extracted documents stored as `<dir>/<hash>.json`.
#[derive(Debug, Clone)]
pub struct ExtractionCache {
    dir: PathBuf,
}

impl ExtractionCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `hash`.
    pub fn entry_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}.json"))
    }

    /// Load a cached document.
    ///
    /// A missing entry is `Ok(None)`. An unreadable or corrupt entry is
    /// reported to `sink` and also treated as a miss.
    pub fn load(&self, hash: &str, sink: &dyn DiagnosticSink) -> Result<Option<Document>> {
        let path = self.entry_path(hash);
        if !path.exists() {
            return Ok(None);
        }

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                sink.warn(&format!("cache entry {} unreadable: {}", path.display(), e));
                return Ok(None);
            }
        };
        match serde_json::from_str(&data) {
            Ok(doc) => {
                sink.debug(&format!("cache hit: {}", path.display()));
                Ok(Some(doc))
            }
            Err(e) => {
                sink.warn(&format!("cache entry {} corrupt, ignoring: {}", path.display(), e));
                Ok(None)
            }
        }
    }

    /// Store a document under `hash`, creating the cache directory if needed.
    pub fn store(&self, hash: &str, doc: &Document) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(hash);
        fs::write(&path, serde_json::to_string(doc)?)?;
        Ok(path)
    }
}
