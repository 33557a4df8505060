//! Text normalization: Unicode composition, ligatures, typographic
//! characters, dehyphenation and whitespace.
//!
//! Every transformation is controlled by its own toggle. A disabled toggle
//! leaves the text byte-identical.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Precomposed ligature glyphs and their letter sequences.
pub const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"), // long s + t
    ('\u{FB06}', "st"),
];

/// Typographic quotes, dashes, spaces and bullets with their ASCII forms.
pub const CHAR_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{00AD}', ""), // soft hyphen
    ('\u{200B}', ""), // zero-width space
    ('\u{2022}', "-"),
    ('\u{00B7}', "-"),
];

static HYPHENATED_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)-\n\s*([a-z])").expect("Invalid dehyphenation regex"));

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid newline regex"));

/// Independent text normalization toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// NFC composition and ligature expansion
    pub normalize_unicode: bool,

    /// Curly quotes, dashes, ellipsis, special spaces and bullets to ASCII
    pub normalize_quotes: bool,

    /// Rejoin words broken with a hyphen at a line end
    pub dehyphenate: bool,

    /// Collapse horizontal runs, unify line endings, cap blank lines
    pub normalize_whitespace: bool,
}

impl NormalizeOptions {
    /// Every transformation enabled.
    pub fn all() -> Self {
        Self {
            normalize_unicode: true,
            normalize_quotes: true,
            dehyphenate: true,
            normalize_whitespace: true,
        }
    }

    /// Every transformation disabled (passthrough).
    pub fn none() -> Self {
        Self {
            normalize_unicode: false,
            normalize_quotes: false,
            dehyphenate: false,
            normalize_whitespace: false,
        }
    }

    pub fn with_unicode(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    pub fn with_quotes(mut self, enabled: bool) -> Self {
        self.normalize_quotes = enabled;
        self
    }

    pub fn with_dehyphenate(mut self, enabled: bool) -> Self {
        self.dehyphenate = enabled;
        self
    }

    pub fn with_whitespace(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Apply every enabled transformation to `text`.
///
/// Character-level mapping runs first, then dehyphenation, then whitespace
/// normalization. The assembler calls the stages separately because each
/// one applies at a different scope (fragment, page, document).
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    let mut result = normalize_characters(text, options);
    if options.dehyphenate {
        result = dehyphenate(&result);
    }
    if options.normalize_whitespace {
        result = normalize_whitespace(&result);
    }
    result
}

/// Character-level normalization of a single fragment.
pub fn normalize_characters(text: &str, options: &NormalizeOptions) -> String {
    if !options.normalize_unicode && !options.normalize_quotes {
        return text.to_string();
    }

    let composed: String = if options.normalize_unicode {
        text.nfc().collect()
    } else {
        text.to_string()
    };

    let mut result = String::with_capacity(composed.len());
    for c in composed.chars() {
        if options.normalize_unicode {
            if let Some(expanded) = lookup(LIGATURES, c) {
                result.push_str(expanded);
                continue;
            }
        }
        if options.normalize_quotes {
            if let Some(replacement) = lookup(CHAR_REPLACEMENTS, c) {
                result.push_str(replacement);
                continue;
            }
        }
        result.push(c);
    }
    result
}

fn lookup(table: &[(char, &'static str)], c: char) -> Option<&'static str> {
    table
        .iter()
        .find_map(|&(from, to)| (from == c).then_some(to))
}

/// Rejoin words split by a line-end hyphen.
///
/// `docu-\nment` becomes `document`. The continuation must start with a
/// lowercase letter and may be preceded by whitespace, including further
/// line breaks, so a break that falls between two fragments is also joined.
/// Hyphenated compounds on a single line are untouched.
pub fn dehyphenate(text: &str) -> String {
    HYPHENATED_BREAK.replace_all(text, "$1$2").into_owned()
}

/// Normalize whitespace over an assembled document.
///
/// Line endings become `\n`. Leading indentation is kept, later runs of
/// spaces and tabs collapse to a single space, trailing whitespace is
/// stripped, and three or more consecutive newlines become two.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    for (i, line) in unified.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let body = line.trim_start_matches([' ', '\t']);
        let indent = &line[..line.len() - body.len()];
        let collapsed = collapse_horizontal(body);
        let content = collapsed.trim_end_matches([' ', '\t']);
        if !content.is_empty() {
            out.push_str(indent);
            out.push_str(content);
        }
    }

    EXCESS_NEWLINES.replace_all(&out, "\n\n").into_owned()
}

fn collapse_horizontal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligatures_expand() {
        let opts = NormalizeOptions::all();
        assert_eq!(normalize_characters("\u{FB01}nal \u{FB00}ect", &opts), "final ffect");
        assert_eq!(normalize_characters("e\u{FB03}cient", &opts), "efficient");
    }

    #[test]
    fn test_quotes_and_dashes() {
        let opts = NormalizeOptions::all();
        assert_eq!(
            normalize_characters("\u{201C}Hi\u{201D} \u{2014} it\u{2019}s\u{2026}", &opts),
            "\"Hi\" -- it's..."
        );
        assert_eq!(normalize_characters("a\u{00AD}b\u{200B}c\u{00A0}d", &opts), "abc d");
        assert_eq!(normalize_characters("\u{2022} item", &opts), "- item");
    }

    #[test]
    fn test_nfc_composition() {
        let opts = NormalizeOptions::none().with_unicode(true);
        assert_eq!(normalize_characters("e\u{0301}", &opts), "\u{00E9}");
    }

    #[test]
    fn test_toggles_are_independent() {
        let quotes_only = NormalizeOptions::none().with_quotes(true);
        assert_eq!(
            normalize_characters("\u{FB01} \u{2019}", &quotes_only),
            "\u{FB01} '"
        );

        let unicode_only = NormalizeOptions::none().with_unicode(true);
        assert_eq!(
            normalize_characters("\u{FB01} \u{2019}", &unicode_only),
            "fi \u{2019}"
        );
    }

    #[test]
    fn test_disabled_is_passthrough() {
        let text = "e\u{0301} \u{FB01}  docu-\nment\r\n\n\n\n  x  ";
        assert_eq!(normalize(text, &NormalizeOptions::none()), text);
    }

    #[test]
    fn test_dehyphenate() {
        assert_eq!(dehyphenate("docu-\nment"), "document");
        assert_eq!(dehyphenate("The docu-\n   ment is"), "The document is");
        assert_eq!(dehyphenate("self-aware person"), "self-aware person");
        assert_eq!(dehyphenate("end-\nNext"), "end-\nNext");
    }

    #[test]
    fn test_dehyphenate_across_paragraphs() {
        assert_eq!(dehyphenate("infor-\n\nmation"), "information");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a   b\t\tc"), "a b c");
        assert_eq!(normalize_whitespace("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(normalize_whitespace("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("line   \nnext\t"), "line\nnext");
        assert_eq!(normalize_whitespace("    indented   text"), "    indented text");
    }

    #[test]
    fn test_blank_lines_with_spaces_collapse() {
        assert_eq!(normalize_whitespace("a\n   \n \t \n\nb"), "a\n\nb");
    }

    #[test]
    fn test_whitespace_is_idempotent() {
        let once = normalize_whitespace("  x   y \n\n\n\tz  \r\n");
        assert_eq!(normalize_whitespace(&once), once);
    }
}
