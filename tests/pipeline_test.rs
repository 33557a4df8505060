//! End-to-end tests from raw page descriptions to Markdown files.

use std::fs;

use pdfmark::{
    convert_source, get_preset, CollectingSink, Config, ExtractionCache, IndexEntry,
    OutputWriter, Pdfmark, RawDocument, RawPage, INDEX_FILE,
};

fn three_pages_with_running_text() -> RawDocument {
    let bodies = ["Body one", "Body two", "Body three"];
    RawDocument::new(
        bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                RawPage::new(600.0, 800.0)
                    .with_fragment("ACME Annual Report", [50.0, 20.0, 300.0, 40.0])
                    .with_fragment(*body, [50.0, 300.0, 300.0, 320.0])
                    .with_fragment(
                        format!("Confidential - page {}", i + 1),
                        [50.0, 770.0, 300.0, 790.0],
                    )
            })
            .collect(),
    )
}

#[test]
fn test_two_columns_from_json() {
    let json = r#"{
        "pages": [{
            "width": 600.0,
            "height": 800.0,
            "fragments": [
                {"text": "Right top", "bbox": [350.0, 100.0, 550.0, 120.0]},
                {"text": "Left top", "bbox": [50.0, 100.0, 250.0, 120.0]},
                {"text": "Left bottom", "bbox": [50.0, 300.0, 250.0, 320.0]},
                {"text": "Right bottom", "bbox": [350.0, 300.0, 550.0, 320.0]}
            ]
        }]
    }"#;
    let raw = RawDocument::from_json_str(json).unwrap();
    let conversion = convert_source(&raw, &Config::default()).unwrap();

    assert_eq!(
        conversion.markdown,
        "Left top\n\nLeft bottom\n\nRight top\n\nRight bottom\n"
    );
}

#[test]
fn test_running_headers_and_footers_removed() {
    let conversion = convert_source(&three_pages_with_running_text(), &Config::default()).unwrap();

    assert_eq!(conversion.markdown, "Body one\n\nBody two\n\nBody three\n");
    assert_eq!(conversion.stats.fragments_skipped, 6);
    assert_eq!(conversion.stats.page_count, 3);
}

#[test]
fn test_running_text_kept_when_removal_disabled() {
    let mut config = Config::default();
    config.markdown.text_cleaning.remove_headers = false;

    let markdown = convert_source(&three_pages_with_running_text(), &config)
        .unwrap()
        .markdown;
    assert_eq!(markdown.matches("ACME Annual Report").count(), 3);
    assert!(!markdown.contains("Confidential"));
}

#[test]
fn test_headings_with_detailed_preset() {
    let raw = RawDocument::new(vec![RawPage::new(600.0, 800.0)
        .with_fragment("CHAPTER 12", [50.0, 100.0, 200.0, 120.0])
        .with_fragment("INTRODUCTION", [50.0, 140.0, 200.0, 160.0])
        .with_fragment("Normal text.", [50.0, 180.0, 200.0, 200.0])
        .with_fragment("short", [50.0, 220.0, 200.0, 240.0])]);

    let conversion = convert_source(&raw, &get_preset("detailed").unwrap()).unwrap();
    assert_eq!(
        conversion.markdown,
        "# CHAPTER 12\n\n## INTRODUCTION\n\nNormal text.\n"
    );
    assert_eq!(conversion.stats.heading_count, 2);
}

#[test]
fn test_table_rendered_after_text() {
    let json = r#"{
        "pages": [{
            "width": 600.0,
            "height": 800.0,
            "fragments": [{"text": "Staff list", "bbox": [50.0, 100.0, 250.0, 120.0]}],
            "tables": [[["Name", "Age"], ["Alice", "30"], ["Bob", null]]]
        }]
    }"#;
    let raw = RawDocument::from_json_str(json).unwrap();
    let conversion = convert_source(&raw, &Config::default()).unwrap();

    assert!(conversion.markdown.starts_with("Staff list\n"));
    assert!(conversion.markdown.contains("| Name | Age |\n| ----- | --- |\n| Alice | 30 |"));
    assert!(conversion.markdown.contains("| Bob | |"));
    assert_eq!(conversion.stats.table_count, 1);
}

#[test]
fn test_chunked_output_files() {
    let mut page = RawPage::new(600.0, 2000.0);
    for i in 0..40 {
        let y = 20.0 + i as f32 * 45.0;
        page = page.with_fragment(
            format!("Paragraph {:02} with enough words to take up some room.", i),
            [50.0, y, 500.0, y + 20.0],
        );
    }
    let raw = RawDocument::new(vec![page]);

    let mut config = Config::default();
    config.output.chunk_size_kb = 1;

    let dir = tempfile::tempdir().unwrap();
    let pdfmark = Pdfmark::new(config)
        .unwrap()
        .without_cache()
        .with_output_dir(dir.path())
        .with_sink(CollectingSink::new());
    let written = pdfmark.convert_source(&raw, "long").unwrap();

    assert!(written.len() >= 3, "expected at least two parts: {:?}", written);
    let full = fs::read_to_string(&written[0]).unwrap();
    let mut joined = String::new();
    for part in &written[1..] {
        let chunk = fs::read_to_string(part).unwrap();
        assert!(chunk.len() <= 1024);
        joined.push_str(&chunk);
    }
    assert_eq!(joined, full);
    assert!(written[1].ends_with("long_part001.md"));
}

#[test]
fn test_raw_document_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let raw = RawDocument::new(vec![
        RawPage::new(600.0, 800.0).with_fragment("Stored text", [10.0, 10.0, 100.0, 20.0]),
    ]);
    fs::write(&path, raw.to_json().unwrap()).unwrap();

    let loaded = RawDocument::from_path(&path).unwrap();
    assert_eq!(loaded, raw);
    assert_eq!(
        convert_source(&loaded, &Config::default()).unwrap().markdown,
        "Stored text\n"
    );
}

#[test]
fn test_cache_and_index_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CollectingSink::new();
    let options = Config::default().extract_options();
    let doc = pdfmark::extract(&three_pages_with_running_text(), &options, &sink, None).unwrap();

    let cache = ExtractionCache::new(dir.path().join("raw"));
    let hash = pdfmark::bytes_hash(b"three pages");
    cache.store(&hash, &doc).unwrap();
    let cached = cache.load(&hash, &sink).unwrap().unwrap();
    assert_eq!(cached, doc);

    let writer = OutputWriter::new(dir.path().join("markdown"));
    let path = writer
        .write_index(&[IndexEntry::from_document("report.pdf", &cached)])
        .unwrap();
    assert!(path.ends_with(INDEX_FILE));

    let index = fs::read_to_string(path).unwrap();
    assert!(index.contains("## report.pdf\n- Pages: 3\n- Text blocks: 9\n- Tables: 0\n"));
    assert!(index.contains("- File: [report.pdf](report.md)"));
}
