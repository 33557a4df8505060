//! Text fragments and their bounding boxes.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in PDF user space with a top-left origin (y grows downward).
///
/// Construction always yields `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl BoundingBox {
    /// Create a bounding box, swapping coordinates given in the wrong order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Left edge.
    pub fn x0(&self) -> f32 {
        self.x0
    }

    /// Top edge.
    pub fn y0(&self) -> f32 {
        self.y0
    }

    /// Right edge.
    pub fn x1(&self) -> f32 {
        self.x1
    }

    /// Bottom edge.
    pub fn y1(&self) -> f32 {
        self.y1
    }

    /// Horizontal midpoint, used for column clustering.
    pub fn mid_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// A unit of extracted text with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,

    /// Position on the page; fragments without one are ignored by layout logic
    #[serde(default)]
    pub bbox: Option<BoundingBox>,

    /// Whether the text contains one of the configured block indicators
    #[serde(default)]
    pub has_indicator: bool,

    /// Flagged as a running header
    #[serde(default)]
    pub is_header: bool,

    /// Flagged as a running footer
    #[serde(default)]
    pub is_footer: bool,
}

impl TextFragment {
    /// Create a positioned fragment.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox: Some(bbox),
            has_indicator: false,
            is_header: false,
            is_footer: false,
        }
    }

    /// Create a fragment from raw coordinates.
    pub fn at(text: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(text, BoundingBox::new(x0, y0, x1, y1))
    }

    /// Create a fragment with no known position.
    pub fn unpositioned(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
            has_indicator: false,
            is_header: false,
            is_footer: false,
        }
    }

    /// Mark whether the text carries a block indicator.
    pub fn with_indicator(mut self, has_indicator: bool) -> Self {
        self.has_indicator = has_indicator;
        self
    }

    /// Whether the fragment was flagged as header or footer.
    pub fn is_margin_repeat(&self) -> bool {
        self.is_header || self.is_footer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_orders_coordinates() {
        let bbox = BoundingBox::new(150.0, 50.0, 50.0, 10.0);
        assert_eq!(bbox.x0(), 50.0);
        assert_eq!(bbox.x1(), 150.0);
        assert_eq!(bbox.y0(), 10.0);
        assert_eq!(bbox.y1(), 50.0);
        assert_eq!(bbox.mid_x(), 100.0);
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let fragment = TextFragment::at("Hello", 1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&fragment).unwrap();
        assert!(json.contains("\"bbox\":[1.0,2.0,3.0,4.0]"));

        let back: TextFragment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fragment);
    }

    #[test]
    fn test_deserialize_swapped_bbox() {
        let fragment: TextFragment =
            serde_json::from_str(r#"{"text":"x","bbox":[10,10,0,0]}"#).unwrap();
        let bbox = fragment.bbox.unwrap();
        assert_eq!(bbox.x0(), 0.0);
        assert_eq!(bbox.y1(), 10.0);
        assert!(!fragment.is_header);
    }
}
