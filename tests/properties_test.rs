//! Property tests for reading order and chunking.

use pdfmark::layout::order_fragments;
use pdfmark::render::chunk_text;
use pdfmark::TextFragment;
use proptest::prelude::*;

fn fragment_strategy() -> impl Strategy<Value = TextFragment> {
    (0.0f32..600.0, 0.0f32..800.0, 1.0f32..200.0, 1.0f32..30.0, "[a-z]{1,8}").prop_map(
        |(x, y, w, h, text)| TextFragment::at(text, x, y, x + w, y + h),
    )
}

fn texts(fragments: &[TextFragment]) -> Vec<String> {
    fragments.iter().map(|f| f.text.clone()).collect()
}

proptest! {
    #[test]
    fn test_order_is_permutation_and_idempotent(
        fragments in prop::collection::vec(fragment_strategy(), 0..40),
        threshold in 0.0f32..1.0,
    ) {
        let once = order_fragments(fragments.clone(), 600.0, threshold);
        prop_assert_eq!(once.len(), fragments.len());

        let mut before = texts(&fragments);
        let mut after = texts(&once);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);

        let twice = order_fragments(once.clone(), 600.0, threshold);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn test_single_column_reads_top_to_bottom(
        ys in prop::collection::vec(0.0f32..800.0, 1..30),
    ) {
        let fragments: Vec<TextFragment> = ys
            .iter()
            .enumerate()
            .map(|(i, y)| TextFragment::at(format!("f{i}"), 100.0, *y, 300.0, y + 10.0))
            .collect();

        let ordered = order_fragments(fragments, 600.0, 0.3);
        let tops: Vec<f32> = ordered.iter().map(|f| f.bbox.unwrap().y0()).collect();
        prop_assert!(tops.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_chunks_concatenate_to_input(
        text in "([a-zé😀 ]{0,60}(\n|\n\n|\n\n\n)?){0,30}",
        limit in 1usize..300,
    ) {
        let chunks = chunk_text(&text, limit);
        prop_assert_eq!(chunks.concat(), text.clone());
        for chunk in &chunks {
            // A single character wider than the limit is still emitted whole.
            let single_char = chunk.chars().count() == 1;
            prop_assert!(chunk.len() <= limit || single_char, "chunk {:?} over {}", chunk, limit);
        }
    }

    #[test]
    fn test_zero_limit_returns_input(text in ".{0,200}") {
        prop_assert_eq!(chunk_text(&text, 0), vec![text.clone()]);
    }
}

#[test]
fn test_empty_text_single_empty_chunk() {
    assert_eq!(chunk_text("", 10), vec![String::new()]);
}
