//! Building a [`Document`] from a page source.
//!
//! Extraction runs in three phases: every page is pulled from the source and
//! filtered, each page is put into reading order, then running headers and
//! footers are detected across the whole document.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::diagnostics::DiagnosticSink;
use crate::error::{Error, Result};
use crate::layout::{detect_headers_footers, order_fragments};
use crate::model::{BoundingBox, Document, Page, TextFragment};
use crate::source::{PageSource, RawPage};

/// Options for turning raw pages into a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Fragments with fewer characters (after trimming) are dropped
    pub min_text_length: usize,

    /// Put fragments into column-aware reading order
    pub sort_blocks: bool,

    /// Column tolerance as a fraction of page width
    pub column_threshold: f32,

    /// Flag running headers and footers
    pub detect_headers_footers: bool,

    /// Margin zone height as a fraction of page height
    pub header_footer_margin: f32,

    /// Substrings that mark a fragment with `has_indicator`
    pub block_indicators: Vec<String>,

    /// Order pages in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum fragment length.
    pub fn with_min_text_length(mut self, chars: usize) -> Self {
        self.min_text_length = chars;
        self
    }

    /// Enable or disable reading-order resolution.
    pub fn with_sort_blocks(mut self, sort: bool) -> Self {
        self.sort_blocks = sort;
        self
    }

    /// Set the column threshold.
    pub fn with_column_threshold(mut self, threshold: f32) -> Self {
        self.column_threshold = threshold;
        self
    }

    /// Enable or disable header/footer detection.
    pub fn with_header_footer_detection(mut self, detect: bool) -> Self {
        self.detect_headers_footers = detect;
        self
    }

    /// Set the header/footer margin fraction.
    pub fn with_margin(mut self, fraction: f32) -> Self {
        self.header_footer_margin = fraction;
        self
    }

    /// Set the block indicator substrings.
    pub fn with_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_text_length: 0,
            sort_blocks: true,
            column_threshold: 0.3,
            detect_headers_footers: true,
            header_footer_margin: 0.1,
            block_indicators: Vec::new(),
            parallel: true,
        }
    }
}

/// Cooperative cancellation flag, checked between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Clones of the token observe it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Extract a [`Document`] from a page source.
pub fn extract(
    source: &dyn PageSource,
    options: &ExtractOptions,
    sink: &dyn DiagnosticSink,
    cancel: Option<&CancelToken>,
) -> Result<Document> {
    Extractor::new(options, sink).with_cancel(cancel).extract(source)
}

/// Runs the extraction phases with a fixed set of options.
pub struct Extractor<'a> {
    options: &'a ExtractOptions,
    sink: &'a dyn DiagnosticSink,
    cancel: Option<&'a CancelToken>,
}

impl<'a> Extractor<'a> {
    pub fn new(options: &'a ExtractOptions, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            options,
            sink,
            cancel: None,
        }
    }

    /// Check `cancel` between pages.
    pub fn with_cancel(mut self, cancel: Option<&'a CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run all phases.
    ///
    /// A page the source cannot read is reported to the sink and kept as an
    /// empty page so numbering stays intact.
    pub fn extract(&self, source: &dyn PageSource) -> Result<Document> {
        let page_count = source.page_count();
        let mut pages = Vec::with_capacity(page_count);

        for index in 0..page_count {
            self.check_cancelled()?;
            let number = index as u32 + 1;
            let page = match source.page(index) {
                Ok(raw) => self.build_page(number, raw),
                Err(e) => {
                    self.sink
                        .warn(&format!("page {}: {}; recorded as empty", number, e));
                    Page::new(number, 0.0, 0.0)
                }
            };
            pages.push(page);
        }

        if self.options.sort_blocks {
            self.check_cancelled()?;
            let threshold = self.options.column_threshold;
            if self.options.parallel {
                pages
                    .par_iter_mut()
                    .for_each(|page| order_page(page, threshold));
            } else {
                pages.iter_mut().for_each(|page| order_page(page, threshold));
            }
        }

        let mut doc = Document::new();
        for page in pages {
            doc.add_page(page);
        }

        if self.options.detect_headers_footers {
            self.check_cancelled()?;
            detect_headers_footers(&mut doc, self.options.header_footer_margin);
        }

        self.sink.debug(&format!(
            "extracted {} page(s), {} fragment(s), {} table(s)",
            doc.total_pages, doc.text_fragments, doc.tables
        ));
        Ok(doc)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            self.sink.info("extraction cancelled");
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    fn build_page(&self, number: u32, raw: RawPage) -> Page {
        let mut page = Page::new(number, raw.width, raw.height.unwrap_or(0.0));

        for fragment in raw.fragments {
            let text = fragment.text.trim();
            if text.is_empty() || text.chars().count() < self.options.min_text_length {
                continue;
            }
            let has_indicator = self
                .options
                .block_indicators
                .iter()
                .any(|indicator| text.contains(indicator.as_str()));
            let bbox = fragment.bbox.and_then(valid_bbox);
            let built = match bbox {
                Some(bbox) => TextFragment::new(text, bbox),
                None => TextFragment::unpositioned(text),
            };
            page.add_fragment(built.with_indicator(has_indicator));
        }

        for table in raw.tables {
            page.add_table(table);
        }
        page
    }
}

fn valid_bbox(coords: [f32; 4]) -> Option<BoundingBox> {
    coords
        .iter()
        .all(|c| c.is_finite())
        .then(|| BoundingBox::from(coords))
}

fn order_page(page: &mut Page, column_threshold: f32) {
    let fragments = std::mem::take(&mut page.fragments);
    page.fragments = order_fragments(fragments, page.width, column_threshold);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, Level};
    use crate::model::Table;
    use crate::source::{RawDocument, RawFragment};

    struct FlakySource;

    impl PageSource for FlakySource {
        fn page_count(&self) -> usize {
            2
        }

        fn page(&self, index: usize) -> Result<RawPage> {
            match index {
                0 => Ok(RawPage::new(600.0, 800.0).with_fragment("Readable", [0.0, 0.0, 10.0, 10.0])),
                _ => Err(Error::PdfParse("broken content stream".into())),
            }
        }
    }

    fn two_column_page() -> RawPage {
        RawPage::new(500.0, 800.0)
            .with_fragment("Col2 Top", [350.0, 10.0, 450.0, 50.0])
            .with_fragment("Col1 Bottom", [50.0, 100.0, 150.0, 150.0])
            .with_fragment("Col1 Top", [50.0, 10.0, 150.0, 50.0])
            .with_fragment("Col2 Bottom", [350.0, 100.0, 450.0, 150.0])
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_filters_and_counts() {
        let source = RawDocument::new(vec![RawPage::new(600.0, 800.0)
            .with_fragment("  ok text  ", [0.0, 0.0, 10.0, 10.0])
            .with_fragment("no", [0.0, 20.0, 10.0, 30.0])
            .with_fragment("   ", [0.0, 40.0, 10.0, 50.0])
            .with_table(Table::from_strings([["a"]]))]);
        let options = ExtractOptions::new().with_min_text_length(3);
        let sink = CollectingSink::new();

        let doc = extract(&source, &options, &sink, None).unwrap();
        assert_eq!(doc.text_fragments, 1);
        assert_eq!(doc.tables, 1);
        assert_eq!(doc.pages[0].fragments[0].text, "ok text");
    }

    #[test]
    fn test_reading_order_applied() {
        let source = RawDocument::new(vec![two_column_page()]);
        let sink = CollectingSink::new();

        let doc = extract(&source, &ExtractOptions::default(), &sink, None).unwrap();
        assert_eq!(
            texts(&doc.pages[0]),
            vec!["Col1 Top", "Col1 Bottom", "Col2 Top", "Col2 Bottom"]
        );

        let unsorted = ExtractOptions::new().with_sort_blocks(false);
        let doc = extract(&source, &unsorted, &sink, None).unwrap();
        assert_eq!(texts(&doc.pages[0])[0], "Col2 Top");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let source = RawDocument::new((0..8).map(|_| two_column_page()).collect());
        let sink = CollectingSink::new();

        let parallel = extract(&source, &ExtractOptions::default(), &sink, None).unwrap();
        let sequential =
            extract(&source, &ExtractOptions::default().sequential(), &sink, None).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_indicators() {
        let source = RawDocument::new(vec![RawPage::new(600.0, 800.0)
            .with_fragment("NOTE: careful", [0.0, 0.0, 10.0, 10.0])
            .with_fragment("plain", [0.0, 20.0, 10.0, 30.0])]);
        let options = ExtractOptions::new().with_indicators(["NOTE:"]);
        let doc = extract(&source, &options, &CollectingSink::new(), None).unwrap();

        assert!(doc.pages[0].fragments[0].has_indicator);
        assert!(!doc.pages[0].fragments[1].has_indicator);
    }

    #[test]
    fn test_unpositioned_kept_last() {
        let mut page = RawPage::new(600.0, 800.0).with_fragment("placed", [0.0, 50.0, 10.0, 60.0]);
        page.fragments.insert(
            0,
            RawFragment {
                text: "loose".into(),
                bbox: None,
            },
        );
        let source = RawDocument::new(vec![page]);
        let doc = extract(&source, &ExtractOptions::default(), &CollectingSink::new(), None).unwrap();
        assert_eq!(texts(&doc.pages[0]), vec!["placed", "loose"]);
    }

    #[test]
    fn test_failed_page_recorded_empty() {
        let sink = CollectingSink::new();
        let doc = extract(&FlakySource, &ExtractOptions::default(), &sink, None).unwrap();

        assert_eq!(doc.total_pages, 2);
        assert!(doc.pages[1].is_empty());
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(sink.messages(Level::Warn).len(), 1);
    }

    #[test]
    fn test_headers_flagged() {
        let pages = (1..=3)
            .map(|n| {
                RawPage::new(600.0, 800.0)
                    .with_fragment("Annual Report", [50.0, 10.0, 300.0, 30.0])
                    .with_fragment(format!("Body {n}"), [50.0, 300.0, 300.0, 330.0])
            })
            .collect();
        let source = RawDocument::new(pages);
        let doc = extract(&source, &ExtractOptions::default(), &CollectingSink::new(), None).unwrap();

        for page in &doc.pages {
            assert!(page.fragments[0].is_header);
            assert!(!page.fragments[1].is_header);
        }
    }

    #[test]
    fn test_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let source = RawDocument::new(vec![two_column_page()]);
        let result = extract(&source, &ExtractOptions::default(), &CollectingSink::new(), Some(&token));
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
