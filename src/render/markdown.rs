//! Markdown assembly for extracted documents.

use crate::error::{Error, Result};
use crate::extract::CancelToken;
use crate::model::{Document, Page};

use super::{
    apply_formatting, chunk_text, dehyphenate, normalize_characters, normalize_whitespace,
    render_table, AssemblyStats, Conversion, MarkdownOptions,
};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &MarkdownOptions) -> Conversion {
    DocumentAssembler::new(options).assemble(doc)
}

/// Turns an extracted [`Document`] into Markdown text and chunks.
///
/// Per page, surviving fragments are normalized and joined with blank
/// lines, dehyphenated across fragment boundaries, formatted and classified
/// line by line, then followed by the page's tables. Whitespace is
/// normalized once over the whole document before chunking.
pub struct DocumentAssembler<'a> {
    options: &'a MarkdownOptions,
    stats: AssemblyStats,
}

impl<'a> DocumentAssembler<'a> {
    /// Create a new assembler.
    pub fn new(options: &'a MarkdownOptions) -> Self {
        Self {
            options,
            stats: AssemblyStats::new(),
        }
    }

    /// Assemble the whole document.
    pub fn assemble(mut self, doc: &Document) -> Conversion {
        let mut output = String::new();
        for page in &doc.pages {
            self.render_page(&mut output, page);
        }
        self.finish(output)
    }

    /// Assemble the document, checking `cancel` before each page.
    ///
    /// Returns [`Error::Cancelled`] if the token fires; a page is never left
    /// half rendered.
    pub fn assemble_cancellable(
        mut self,
        doc: &Document,
        cancel: Option<&CancelToken>,
    ) -> Result<Conversion> {
        let mut output = String::new();
        for page in &doc.pages {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                log::info!("assembly cancelled before page {}", page.number);
                return Err(Error::Cancelled);
            }
            self.render_page(&mut output, page);
        }
        Ok(self.finish(output))
    }

    fn finish(mut self, mut output: String) -> Conversion {
        if self.options.normalize.normalize_whitespace {
            output = normalize_whitespace(&output);
        }

        let mut markdown = output.trim().to_string();
        markdown.push('\n');

        let chunks = chunk_text(&markdown, self.options.chunk_limit_bytes());
        self.stats.byte_count = markdown.len() as u64;
        self.stats.chunk_count = chunks.len() as u32;

        log::debug!(
            "assembled {} page(s) into {} bytes, {} chunk(s)",
            self.stats.page_count,
            self.stats.byte_count,
            self.stats.chunk_count
        );

        Conversion {
            markdown,
            chunks,
            stats: self.stats,
        }
    }

    fn render_page(&mut self, output: &mut String, page: &Page) {
        self.stats.page_count += 1;

        let mut texts = Vec::with_capacity(page.fragments.len());
        for fragment in &page.fragments {
            if (fragment.is_header && self.options.remove_headers)
                || (fragment.is_footer && self.options.remove_footers)
            {
                self.stats.fragments_skipped += 1;
                continue;
            }
            texts.push(normalize_characters(&fragment.text, &self.options.normalize));
            self.stats.fragments_rendered += 1;
        }

        let mut page_text = texts.join("\n\n");
        if self.options.normalize.dehyphenate {
            page_text = dehyphenate(&page_text);
        }

        for raw_line in page_text.lines() {
            self.render_line(output, raw_line);
        }

        if self.options.render_tables {
            for table in page.tables.iter().filter(|t| !t.is_empty()) {
                let rendered = render_table(table);
                if !rendered.is_empty() {
                    self.stats.table_count += 1;
                }
                output.push('\n');
                output.push_str(&rendered);
                output.push('\n');
            }
        }

        if !output.is_empty() && !output.ends_with("\n\n") {
            output.push('\n');
        }
    }

    fn render_line(&mut self, output: &mut String, raw_line: &str) {
        let line = apply_formatting(raw_line, &self.options.formatting);
        match self.options.headings.classify(&line) {
            Some(kind) => {
                self.stats.heading_count += 1;
                output.push_str(kind.marker());
                output.push(' ');
                output.push_str(line.trim());
                output.push_str("\n\n");
            }
            None => {
                output.push_str(&line);
                output.push('\n');
            }
        }
    }
}
