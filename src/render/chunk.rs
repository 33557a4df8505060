//! Size-bounded chunking of rendered Markdown.
//!
//! Sizes are UTF-8 byte counts. Chunks never split inside a character and
//! their concatenation always reproduces the input exactly.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\n+").expect("Invalid paragraph regex"));

/// Split `text` into chunks of at most `limit_bytes` bytes.
///
/// Paragraphs and the blank-line runs between them are packed greedily. A
/// paragraph larger than the limit starts a fresh chunk and is packed line
/// by line; a single line larger than the limit is cut at character
/// boundaries. A limit of 0 disables chunking.
pub fn chunk_text(text: &str, limit_bytes: usize) -> Vec<String> {
    if limit_bytes == 0 {
        return vec![text.to_string()];
    }

    let mut packer = Packer::new(limit_bytes);
    for token in paragraph_tokens(text) {
        if token.len() > limit_bytes {
            packer.flush();
            for line in token.split_inclusive('\n') {
                for piece in char_bounded_pieces(line, limit_bytes) {
                    packer.push(piece);
                }
            }
        } else {
            packer.push(token);
        }
    }
    packer.finish()
}

struct Packer {
    limit: usize,
    chunks: Vec<String>,
    current: String,
}

impl Packer {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            chunks: Vec::new(),
            current: String::new(),
        }
    }

    fn push(&mut self, piece: &str) {
        if !self.current.is_empty() && self.current.len() + piece.len() > self.limit {
            self.flush();
        }
        self.current.push_str(piece);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        if self.chunks.is_empty() {
            self.chunks.push(String::new());
        }
        self.chunks
    }
}

/// Paragraphs interleaved with the separators between them, empty tokens skipped.
fn paragraph_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for sep in PARAGRAPH_BREAK.find_iter(text) {
        if sep.start() > last {
            tokens.push(&text[last..sep.start()]);
        }
        tokens.push(sep.as_str());
        last = sep.end();
    }
    if last < text.len() {
        tokens.push(&text[last..]);
    }
    tokens
}

/// Cut `line` into pieces of at most `limit` bytes on character boundaries.
///
/// A piece always holds at least one character, so a limit smaller than a
/// character's encoding yields one oversized piece per character.
fn char_bounded_pieces(line: &str, limit: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < line.len() {
        let mut end = (start + limit).min(line.len());
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            end = start + line[start..].chars().next().map_or(1, char::len_utf8);
        }
        pieces.push(&line[start..end]);
        start = end;
    }
    pieces
}
