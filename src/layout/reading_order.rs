//! Column-aware reading order for a single page.
//!
//! Fragments are clustered into columns by their horizontal midpoint, each
//! column is read top to bottom, and columns are read left to right. Every
//! sort is stable so identical input always yields identical output.

use crate::model::TextFragment;

/// A column of fragments discovered on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Running mean of the members' horizontal midpoints
    pub mean_mid_x: f32,
    /// Members, sorted top to bottom once clustering is complete
    pub members: Vec<TextFragment>,
}

impl Column {
    fn start(mid_x: f32, fragment: TextFragment) -> Self {
        Self {
            mean_mid_x: mid_x,
            members: vec![fragment],
        }
    }

    fn push(&mut self, mid_x: f32, fragment: TextFragment) {
        let n = self.members.len() as f32;
        self.mean_mid_x += (mid_x - self.mean_mid_x) / (n + 1.0);
        self.members.push(fragment);
    }

    /// Whether a midpoint belongs to this column under the given tolerance.
    pub fn accepts(&self, mid_x: f32, tolerance: f32) -> bool {
        (mid_x - self.mean_mid_x).abs() <= tolerance
    }
}

/// Group positioned fragments into columns ordered left to right.
///
/// The column mean is updated as members join, so a wide column whose
/// fragments drift slightly is still recognized as one column. Fragments
/// without a bounding box are not clustered and are returned separately in
/// arrival order.
pub fn cluster_columns(
    fragments: Vec<TextFragment>,
    page_width: f32,
    column_threshold: f32,
) -> (Vec<Column>, Vec<TextFragment>) {
    let tolerance = column_tolerance(page_width, column_threshold);

    let mut positioned = Vec::with_capacity(fragments.len());
    let mut unpositioned = Vec::new();
    for fragment in fragments {
        match fragment.bbox {
            Some(bbox) => positioned.push((bbox.mid_x(), fragment)),
            None => unpositioned.push(fragment),
        }
    }

    positioned.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut columns: Vec<Column> = Vec::new();
    for (mid_x, fragment) in positioned {
        match columns.last_mut() {
            Some(column) if column.accepts(mid_x, tolerance) => column.push(mid_x, fragment),
            _ => columns.push(Column::start(mid_x, fragment)),
        }
    }

    for column in &mut columns {
        column.members.sort_by(|a, b| top(a).total_cmp(&top(b)));
    }
    columns.sort_by(|a, b| a.mean_mid_x.total_cmp(&b.mean_mid_x));

    (columns, unpositioned)
}

/// Order a page's fragments into natural reading sequence.
///
/// Columns are concatenated left to right, each read top to bottom.
/// Fragments without a bounding box keep their relative order and follow the
/// positioned ones.
pub fn order(
    fragments: Vec<TextFragment>,
    page_width: f32,
    column_threshold: f32,
) -> Vec<TextFragment> {
    if fragments.len() < 2 {
        return fragments;
    }

    let total = fragments.len();
    let (columns, unpositioned) = cluster_columns(fragments, page_width, column_threshold);

    let mut ordered = Vec::with_capacity(total);
    for column in columns {
        ordered.extend(column.members);
    }
    ordered.extend(unpositioned);
    ordered
}

fn column_tolerance(page_width: f32, column_threshold: f32) -> f32 {
    let tolerance = column_threshold * page_width;
    if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        0.0
    }
}

fn top(fragment: &TextFragment) -> f32 {
    fragment.bbox.map(|b| b.y0()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fragments: &[TextFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_single_column_top_to_bottom() {
        let fragments = vec![
            TextFragment::at("Third", 50.0, 200.0, 150.0, 250.0),
            TextFragment::at("First", 50.0, 10.0, 150.0, 50.0),
            TextFragment::at("Second", 50.0, 100.0, 150.0, 150.0),
        ];
        let ordered = order(fragments, 500.0, 0.3);
        assert_eq!(texts(&ordered), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_two_columns_left_then_right() {
        let fragments = vec![
            TextFragment::at("Col2 Top", 350.0, 10.0, 450.0, 50.0),
            TextFragment::at("Col1 Bottom", 50.0, 100.0, 150.0, 150.0),
            TextFragment::at("Col1 Top", 50.0, 10.0, 150.0, 50.0),
            TextFragment::at("Col2 Bottom", 350.0, 100.0, 450.0, 150.0),
        ];
        let ordered = order(fragments, 500.0, 0.3);
        assert_eq!(
            texts(&ordered),
            vec!["Col1 Top", "Col1 Bottom", "Col2 Top", "Col2 Bottom"]
        );
    }

    #[test]
    fn test_empty_and_single() {
        assert!(order(Vec::new(), 500.0, 0.3).is_empty());

        let single = vec![TextFragment::at("Only", 0.0, 0.0, 10.0, 10.0)];
        assert_eq!(order(single.clone(), 500.0, 0.3), single);
    }

    #[test]
    fn test_zero_width_page_splits_every_midpoint() {
        let fragments = vec![
            TextFragment::at("B", 20.0, 0.0, 30.0, 10.0),
            TextFragment::at("A", 0.0, 50.0, 10.0, 60.0),
        ];
        let (columns, _) = cluster_columns(fragments.clone(), 0.0, 0.3);
        assert_eq!(columns.len(), 2);

        let ordered = order(fragments, 0.0, 0.3);
        assert_eq!(texts(&ordered), vec!["A", "B"]);
    }

    #[test]
    fn test_midpoint_ties_keep_arrival_order() {
        let fragments = vec![
            TextFragment::at("first", 0.0, 10.0, 100.0, 20.0),
            TextFragment::at("second", 0.0, 10.0, 100.0, 20.0),
        ];
        let ordered = order(fragments, 500.0, 0.3);
        assert_eq!(texts(&ordered), vec!["first", "second"]);
    }

    #[test]
    fn test_running_mean_tolerates_drift() {
        // Each step stays within tolerance of the running mean.
        let fragments = vec![
            TextFragment::at("a", 0.0, 0.0, 100.0, 10.0),
            TextFragment::at("b", 20.0, 20.0, 120.0, 30.0),
            TextFragment::at("c", 40.0, 40.0, 140.0, 50.0),
        ];
        let (columns, _) = cluster_columns(fragments, 100.0, 0.3);
        assert_eq!(columns.len(), 1);
        assert!((columns[0].mean_mid_x - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_unpositioned_fragments_follow() {
        let fragments = vec![
            TextFragment::unpositioned("loose"),
            TextFragment::at("placed", 0.0, 0.0, 10.0, 10.0),
        ];
        let ordered = order(fragments, 500.0, 0.3);
        assert_eq!(texts(&ordered), vec!["placed", "loose"]);
    }

    #[test]
    fn test_order_is_idempotent() {
        let fragments = vec![
            TextFragment::at("r2", 300.0, 80.0, 480.0, 90.0),
            TextFragment::at("l1", 10.0, 10.0, 200.0, 20.0),
            TextFragment::at("r1", 300.0, 10.0, 480.0, 20.0),
            TextFragment::at("l2", 10.0, 80.0, 200.0, 90.0),
        ];
        let once = order(fragments, 500.0, 0.3);
        let twice = order(once.clone(), 500.0, 0.3);
        assert_eq!(once, twice);
    }
}
