//! PDF page source backed by `lopdf`.
//!
//! Each `BT`..`ET` text object becomes one raw fragment. Its bounding box is
//! estimated from the text matrix and font size, then flipped to a top-left
//! origin. Tables are not detected.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use super::{PageSource, RawFragment, RawPage};
use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Descender depth below the baseline as a fraction of the font size.
const DESCENT: f32 = 0.2;

/// Kerning adjustment (thousandths of an em) treated as a word gap in `TJ`.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Page source reading a PDF through `lopdf`.
pub struct LopdfSource {
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get the PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            Error::PdfParse(format!(
                "page index {} out of range ({} pages)",
                index,
                self.page_ids.len()
            ))
        })
    }

    /// Page box as (origin x, origin y, width, height), following `Parent` inheritance.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;
        // Page trees are shallow; the bound guards against reference cycles.
        for _ in 0..32 {
            if let Ok(obj) = dict.get(b"MediaBox") {
                let array = match obj {
                    Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
                    other => other.as_array().ok()?,
                };
                let values: Vec<f32> = array.iter().filter_map(get_number).collect();
                if values.len() < 4 {
                    return None;
                }
                let (x0, x1) = (values[0].min(values[2]), values[0].max(values[2]));
                let (y0, y1) = (values[1].min(values[3]), values[1].max(values[3]));
                return Some([x0, y0, x1 - x0, y1 - y0]);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is blank.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => {
                    Ok(s.decompressed_content().unwrap_or_else(|_| s.content.clone()))
                }
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match s.decompressed_content() {
                        Ok(data) => content.extend_from_slice(&data),
                        Err(_) => content.extend_from_slice(&s.content),
                    }
                    content.push(b' ');
                }
            }
        }
        content
    }

    fn decode(&self, font: Option<&&lopdf::Dictionary>, bytes: &[u8]) -> String {
        let encoding = font.and_then(|f| f.get_font_encoding(&self.doc).ok());
        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    fn extract_fragments(&self, page_id: ObjectId, page_box: [f32; 4]) -> Result<Vec<RawFragment>> {
        let fonts: BTreeMap<Vec<u8>, &lopdf::Dictionary> = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let data = self.page_content(page_id)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let content =
            lopdf::content::Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut fragments = Vec::new();
        let mut state = TextState::default();
        let mut object: Option<TextObject> = None;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "BT" => {
                    state.matrix = TextMatrix::default();
                    object = Some(TextObject::default());
                }
                "ET" => {
                    if let Some(finished) = object.take() {
                        if let Some(fragment) = finished.into_fragment(page_box) {
                            fragments.push(fragment);
                        }
                    }
                }
                "Tf" if operands.len() >= 2 => {
                    if let Object::Name(name) = &operands[0] {
                        state.font_name = name.clone();
                    }
                    state.font_size = get_number(&operands[1]).unwrap_or(DEFAULT_FONT_SIZE);
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" if operands.len() >= 2 => {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.matrix.translate(tx, ty);
                }
                "Tm" if operands.len() >= 6 => {
                    let n: Vec<f32> = operands.iter().take(6).map(|o| get_number(o).unwrap_or(0.0)).collect();
                    state.matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                }
                "T*" => state.matrix.next_line(state.leading),
                "Tj" | "'" | "\"" => {
                    if op.operator != "Tj" {
                        state.matrix.next_line(state.leading);
                    }
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if let (Some(obj), Some(Object::String(bytes, _))) =
                        (object.as_mut(), operands.get(index))
                    {
                        let text = self.decode(fonts.get(&state.font_name), bytes);
                        obj.show(&text, &state);
                    }
                }
                "TJ" => {
                    if let (Some(obj), Some(Object::Array(items))) =
                        (object.as_mut(), operands.first())
                    {
                        let font = fonts.get(&state.font_name);
                        let mut combined = String::new();
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    combined.push_str(&self.decode(font, bytes));
                                }
                                other => {
                                    let adjustment = -get_number(other).unwrap_or(0.0);
                                    if adjustment > TJ_SPACE_THRESHOLD
                                        && !combined.is_empty()
                                        && !combined.ends_with(' ')
                                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                                    {
                                        combined.push(' ');
                                    }
                                }
                            }
                        }
                        obj.show(&combined, &state);
                    }
                }
                _ => {}
            }
        }

        // Unterminated text object at the end of the stream.
        if let Some(unfinished) = object {
            if let Some(fragment) = unfinished.into_fragment(page_box) {
                fragments.push(fragment);
            }
        }

        Ok(fragments)
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<RawPage> {
        let page_id = self.page_id(index)?;
        let page_box = self.media_box(page_id).unwrap_or_else(|| {
            log::debug!("page {}: no MediaBox, assuming Letter", index + 1);
            [0.0, 0.0, 612.0, 792.0]
        });
        let fragments = self.extract_fragments(page_id, page_box)?;

        Ok(RawPage {
            width: page_box[2],
            height: Some(page_box[3]),
            fragments,
            tables: Vec::new(),
        })
    }
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    font_name: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            font_name: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_FONT_SIZE,
        }
    }
}

/// Text and extent accumulated for one `BT`..`ET` object, in PDF coordinates.
#[derive(Debug, Default)]
struct TextObject {
    text: String,
    extent: Option<[f32; 4]>,
    last_y: Option<f32>,
    last_end_x: f32,
}

impl TextObject {
    fn show(&mut self, text: &str, state: &TextState) {
        if text.is_empty() {
            return;
        }
        let (x, y) = state.matrix.position();
        let size = (state.font_size * state.matrix.scale()).abs().max(1.0);
        let width = text.chars().count() as f32 * size * AVG_GLYPH_WIDTH;

        match self.last_y {
            Some(last_y) if (last_y - y).abs() > size * 0.5 => self.text.push('\n'),
            Some(_) if x > self.last_end_x + size * 0.1
                && !self.text.ends_with(' ')
                && !text.starts_with(' ') =>
            {
                self.text.push(' ');
            }
            _ => {}
        }
        self.text.push_str(text);
        self.last_y = Some(y);
        self.last_end_x = x + width;

        let glyphs = [x, y - size * DESCENT, x + width, y + size * (1.0 - DESCENT)];
        self.extent = Some(match self.extent {
            Some([x0, y0, x1, y1]) => [
                x0.min(glyphs[0]),
                y0.min(glyphs[1]),
                x1.max(glyphs[2]),
                y1.max(glyphs[3]),
            ],
            None => glyphs,
        });
    }

    /// Convert to a raw fragment with a top-left origin relative to the page box.
    fn into_fragment(self, page_box: [f32; 4]) -> Option<RawFragment> {
        if self.text.trim().is_empty() {
            return None;
        }
        let [origin_x, origin_y, _, height] = page_box;
        let top = origin_y + height;
        let bbox = self.extent.map(|[x0, y0, x1, y1]| {
            [x0 - origin_x, top - y1, x1 - origin_x, top - y0]
        });
        Some(RawFragment {
            text: self.text,
            bbox,
        })
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Scripts written without spaces between words (Chinese, Japanese kana).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x30FF
        | 0x3000..=0x303F)
}

/// Fallback decoding when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_text_simple(&[0x43, 0x61, 0x66, 0xE9]), "Caf\u{00E9}");
    }

    #[test]
    fn test_text_matrix_translate_and_leading() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 100.0, 700.0);
        m.translate(10.0, -5.0);
        assert_eq!(m.position(), (120.0, 690.0));
        m.next_line(12.0);
        assert_eq!(m.position(), (120.0, 666.0));
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn test_text_object_flips_to_top_left() {
        let mut state = TextState::default();
        state.matrix.set(1.0, 0.0, 0.0, 1.0, 72.0, 700.0);
        state.font_size = 10.0;

        let mut obj = TextObject::default();
        obj.show("Hello", &state);
        let fragment = obj.into_fragment([0.0, 0.0, 612.0, 792.0]).unwrap();

        let [x0, y0, x1, y1] = fragment.bbox.unwrap();
        assert_eq!(fragment.text, "Hello");
        assert_eq!(x0, 72.0);
        assert_eq!(x1, 72.0 + 25.0);
        assert!((y0 - 84.0).abs() < 1e-3);
        assert!((y1 - 94.0).abs() < 1e-3);
    }

    #[test]
    fn test_text_object_joins_lines() {
        let mut state = TextState::default();
        state.matrix.set(1.0, 0.0, 0.0, 1.0, 72.0, 700.0);

        let mut obj = TextObject::default();
        obj.show("first", &state);
        state.matrix.next_line(14.0);
        obj.show("second", &state);
        let fragment = obj.into_fragment([0.0, 0.0, 612.0, 792.0]).unwrap();
        assert_eq!(fragment.text, "first\nsecond");
    }

    #[test]
    fn test_blank_text_object_dropped() {
        let mut obj = TextObject::default();
        obj.show("   ", &TextState::default());
        assert!(obj.into_fragment([0.0, 0.0, 612.0, 792.0]).is_none());
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        assert!(LopdfSource::from_bytes(b"not a pdf").is_err());
    }
}
