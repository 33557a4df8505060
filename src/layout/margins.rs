//! Running header and footer detection.
//!
//! A fragment is a running header (footer) when its normalized text shows up
//! in the top (bottom) margin zone on at least half of the document's pages.
//! Detection needs the whole document, so it runs after every page has been
//! extracted.

use std::collections::HashMap;

use crate::model::{Document, TextFragment};

/// Minimum number of pages before detection is attempted.
pub const MIN_PAGES: usize = 3;

/// Fraction of pages a key must appear on to count as repeating.
pub const REPEAT_RATIO: f32 = 0.5;

/// Keys shorter than this (in characters) are too weak a signal.
pub const MIN_KEY_CHARS: usize = 3;

/// Normalize margin text so that running headers compare equal across pages.
///
/// Lowercases, blanks out bare page numbers and `page <n>` prefixes, drops
/// trailing numerals (`Chapter 5` and `Chapter 6` share a key) and collapses
/// internal whitespace.
pub fn comparison_key(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    if !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }

    let mut rest = lower.as_str();
    if let Some(after) = rest.strip_prefix("page") {
        let after = after.trim_start();
        let digits = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());
        if digits > 0 {
            rest = &after[digits..];
        }
    }

    let rest = rest.trim_end().trim_end_matches(|c: char| c.is_ascii_digit());
    rest.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Which margin zones a fragment falls into on its page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Zones {
    header: bool,
    footer: bool,
}

fn zones(fragment: &TextFragment, page_height: f32, margin_fraction: f32) -> Zones {
    let Some(bbox) = fragment.bbox else {
        return Zones::default();
    };
    let header_zone = page_height * margin_fraction;
    let footer_zone = page_height * (1.0 - margin_fraction);
    Zones {
        header: bbox.y0() < header_zone,
        footer: bbox.y1() > footer_zone,
    }
}

/// Flag fragments that repeat in the margin zones across the document.
///
/// Never fails: documents with fewer than [`MIN_PAGES`] pages are left
/// untouched, fragments without a bounding box are ignored and pages
/// without a usable height use the default height. Running it twice on the
/// same input yields the same flags.
pub fn detect(document: &mut Document, margin_fraction: f32) {
    let page_count = document.pages.len();
    if page_count < MIN_PAGES {
        log::debug!(
            "header/footer detection skipped: {} page(s), need {}",
            page_count,
            MIN_PAGES
        );
        return;
    }

    let margin_fraction = if margin_fraction.is_finite() {
        margin_fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut header_counts: HashMap<String, usize> = HashMap::new();
    let mut footer_counts: HashMap<String, usize> = HashMap::new();

    for page in &document.pages {
        let height = page.effective_height();
        for fragment in &page.fragments {
            let zone = zones(fragment, height, margin_fraction);
            if !zone.header && !zone.footer {
                continue;
            }
            let key = comparison_key(&fragment.text);
            if key.chars().count() < MIN_KEY_CHARS {
                continue;
            }
            if zone.header {
                *header_counts.entry(key.clone()).or_insert(0) += 1;
            }
            if zone.footer {
                *footer_counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    let threshold = REPEAT_RATIO * page_count as f32;
    let is_repeating = |counts: &HashMap<String, usize>, key: &str| {
        counts
            .get(key)
            .is_some_and(|&count| count as f32 >= threshold)
    };

    let mut headers = 0usize;
    let mut footers = 0usize;
    for page in &mut document.pages {
        let height = page.effective_height();
        for fragment in &mut page.fragments {
            let zone = zones(fragment, height, margin_fraction);
            let key = if zone.header || zone.footer {
                comparison_key(&fragment.text)
            } else {
                String::new()
            };
            let eligible = key.chars().count() >= MIN_KEY_CHARS;

            fragment.is_header = eligible && zone.header && is_repeating(&header_counts, &key);
            fragment.is_footer = eligible && zone.footer && is_repeating(&footer_counts, &key);
            headers += usize::from(fragment.is_header);
            footers += usize::from(fragment.is_footer);
        }
    }

    log::debug!(
        "header/footer detection: {} header and {} footer fragment(s) across {} pages",
        headers,
        footers,
        page_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    fn page_with(number: u32, fragments: Vec<TextFragment>) -> Page {
        let mut page = Page::new(number, 600.0, 800.0);
        for fragment in fragments {
            page.add_fragment(fragment);
        }
        page
    }

    fn document(pages: Vec<Page>) -> Document {
        let mut doc = Document::new();
        for page in pages {
            doc.add_page(page);
        }
        doc
    }

    #[test]
    fn test_comparison_key_removes_page_numbers() {
        assert_eq!(comparison_key("42"), "");
        assert_eq!(comparison_key("Page 42"), "");
        assert_eq!(comparison_key("page 1"), "");
    }

    #[test]
    fn test_comparison_key_preserves_content() {
        assert_eq!(comparison_key("Document Title"), "document title");
        assert_eq!(comparison_key("Introduction"), "introduction");
        assert_eq!(comparison_key("  Annual \t Report  "), "annual report");
    }

    #[test]
    fn test_comparison_key_strips_trailing_numbers() {
        assert_eq!(comparison_key("Chapter 5"), "chapter");
        assert_eq!(comparison_key("Page 3 of 10"), "of");
    }

    #[test]
    fn test_marks_repeating_headers() {
        let mut doc = document(
            (1..=3)
                .map(|n| {
                    page_with(
                        n,
                        vec![
                            TextFragment::at("Document Title", 50.0, 20.0, 200.0, 50.0),
                            TextFragment::at(format!("Content {n}"), 50.0, 200.0, 400.0, 400.0),
                        ],
                    )
                })
                .collect(),
        );

        detect(&mut doc, 0.1);

        for fragment in doc.fragments() {
            if fragment.text == "Document Title" {
                assert!(fragment.is_header);
            } else {
                assert!(!fragment.is_header);
            }
            assert!(!fragment.is_footer);
        }
    }

    #[test]
    fn test_needs_minimum_pages() {
        let mut doc = document(
            (1..=2)
                .map(|n| page_with(n, vec![TextFragment::at("Header", 50.0, 20.0, 200.0, 50.0)]))
                .collect(),
        );
        detect(&mut doc, 0.1);
        assert!(doc.fragments().all(|f| !f.is_header && !f.is_footer));
    }

    #[test]
    fn test_majority_rule() {
        // "Running Footer" on 2 of 4 pages (50%) repeats; "Rare Note" on 1 of 4 does not.
        let footer = || TextFragment::at("Running Footer", 50.0, 760.0, 300.0, 790.0);
        let rare = || TextFragment::at("Rare Note", 50.0, 10.0, 300.0, 30.0);
        let mut doc = document(vec![
            page_with(1, vec![footer(), rare()]),
            page_with(2, vec![footer()]),
            page_with(3, vec![]),
            page_with(4, vec![]),
        ]);

        detect(&mut doc, 0.1);

        for fragment in doc.fragments() {
            match fragment.text.as_str() {
                "Running Footer" => assert!(fragment.is_footer),
                _ => assert!(!fragment.is_header && !fragment.is_footer),
            }
        }
    }

    #[test]
    fn test_varying_page_numbers_share_key() {
        let mut doc = document(
            (1..=3)
                .map(|n| {
                    page_with(
                        n,
                        vec![TextFragment::at(format!("Chapter {n}"), 50.0, 5.0, 200.0, 30.0)],
                    )
                })
                .collect(),
        );
        detect(&mut doc, 0.1);
        assert!(doc.fragments().all(|f| f.is_header));
    }

    #[test]
    fn test_short_keys_are_ignored() {
        let mut doc = document(
            (1..=3)
                .map(|n| page_with(n, vec![TextFragment::at(format!("{n}"), 300.0, 770.0, 310.0, 790.0)]))
                .collect(),
        );
        detect(&mut doc, 0.1);
        assert!(doc.fragments().all(|f| !f.is_footer));
    }

    #[test]
    fn test_missing_height_uses_default() {
        let mut doc = document(
            (1..=3)
                .map(|n| {
                    let mut page = Page::new(n, 600.0, 0.0);
                    page.add_fragment(TextFragment::at("Shared Footer", 0.0, 750.0, 100.0, 790.0));
                    page
                })
                .collect(),
        );
        detect(&mut doc, 0.1);
        assert!(doc.fragments().all(|f| f.is_footer));
    }

    #[test]
    fn test_detect_is_idempotent() {
        let mut doc = document(
            (1..=3)
                .map(|n| page_with(n, vec![TextFragment::at("Title", 0.0, 10.0, 100.0, 20.0)]))
                .collect(),
        );
        detect(&mut doc, 0.1);
        let first = doc.clone();
        detect(&mut doc, 0.1);
        assert_eq!(first, doc);
    }
}
