//! Inline formatting markers: bullets, bold and italic.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•·]\s*").expect("Invalid bullet regex"));

static BOLD_STARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("Invalid bold regex"));

static BOLD_UNDERSCORES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^_]+)__").expect("Invalid bold regex"));

static ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(.+?)_").expect("Invalid italic regex"));

/// Which formatting markers survive into the output.
///
/// A marker that is not preserved is stripped, keeping the enclosed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingOptions {
    /// Keep `**x**` and `__x__`
    pub bold: bool,

    /// Keep `*x*` and `_x_`
    pub italic: bool,

    /// Turn leading bullet glyphs into `- ` list markers instead of removing them
    pub lists: bool,
}

impl FormattingOptions {
    /// Preserve every marker.
    pub fn preserve_all() -> Self {
        Self {
            bold: true,
            italic: true,
            lists: true,
        }
    }
}

/// Apply the formatting rules to a single line.
///
/// The line is trimmed first, so the result never carries leading or
/// trailing whitespace.
pub fn apply_formatting(line: &str, options: &FormattingOptions) -> String {
    let trimmed = line.trim();
    let bullet = if options.lists { "- " } else { "" };
    let mut text = LEADING_BULLET.replace(trimmed, bullet).into_owned();

    if !options.bold {
        text = BOLD_STARS.replace_all(&text, "$1").into_owned();
        text = BOLD_UNDERSCORES.replace_all(&text, "$1").into_owned();
    }
    if !options.italic {
        text = strip_single_stars(&text);
        text = ITALIC_UNDERSCORE.replace_all(&text, "$1").into_owned();
    }

    text
}

/// Remove `*x*` pairs whose stars are not part of a `**` run.
fn strip_single_stars(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lone = |i: usize| {
        chars[i] == '*'
            && (i == 0 || chars[i - 1] != '*')
            && chars.get(i + 1) != Some(&'*')
    };

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if lone(i) {
            let close = (i + 1..chars.len()).find(|&j| chars[j] == '*');
            if let Some(close) = close.filter(|&j| j > i + 1 && chars.get(j + 1) != Some(&'*')) {
                out.extend(&chars[i + 1..close]);
                i = close + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
