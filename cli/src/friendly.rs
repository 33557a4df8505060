//! Turning library errors into messages with a hint for the user.

use std::io::ErrorKind;
use std::path::Path;

use pdfmark::Error;

/// A user-facing message with an optional suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friendly {
    pub message: String,
    pub hint: Option<String>,
}

impl Friendly {
    fn new(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

const YAML_HINT: &str = "YAML files are sensitive to indentation and special characters. \
Common issues:\n  - Missing colon after a key (e.g., 'setting value' should be 'setting: value')\n  \
- Incorrect indentation (use spaces, not tabs)\n  - Unquoted special characters";

/// Explain `err`, which happened while working on `path`.
pub fn explain(err: &Error, path: &Path) -> Friendly {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match err {
        Error::Io(e) if e.kind() == ErrorKind::NotFound => Friendly::new(
            format!("Could not find the file: {}", path.display()),
            "Please check that the file path is correct and the file exists.",
        ),
        Error::Io(e) if e.kind() == ErrorKind::PermissionDenied => Friendly::new(
            format!("Permission denied when trying to access: {}", path.display()),
            "Check that you have the necessary permissions for this file or folder.",
        ),
        Error::InvalidPdf(_) | Error::UnknownFormat => Friendly::new(
            format!("The file '{}' doesn't appear to be a valid PDF.", name),
            "Make sure the file is a proper PDF document and not corrupted. \
             If you renamed another file type to .pdf, it won't work.",
        ),
        Error::Encrypted => Friendly::new(
            format!("Failed to extract text from: {}", name),
            "This PDF appears to be password-protected. Please provide an unprotected version.",
        ),
        Error::Yaml(e) => {
            let mut message = format!("There's a formatting issue in your config file: {}", name);
            if let Some(location) = e.location() {
                message.push_str(&format!(
                    "\n  -> Problem found at line {}, column {}",
                    location.line(),
                    location.column()
                ));
            }
            Friendly::new(message, YAML_HINT)
        }
        Error::NoPdfsFound(dir) => Friendly::new(
            format!("No PDF files found in: {}", dir.display()),
            "Place your PDF files in the input/pdfs/ folder, or specify a file directly:\n  \
             pdfmark your-file.pdf\n  pdfmark --pdf path/to/your-file.pdf",
        ),
        Error::UnknownPreset { .. } => Friendly::new(
            err.to_string(),
            "Run 'pdfmark --list-presets' to see the available presets.",
        ),
        Error::InvalidPattern { .. } | Error::Config(_) => Friendly::new(
            err.to_string(),
            "Fix the value in your config file or remove it to use the default.",
        ),
        Error::PdfParse(detail) => Friendly::new(
            format!("Failed to extract text from: {}\n  -> {}", name, truncate(detail, 100)),
            "The PDF file may be corrupted. Try re-downloading or obtaining a fresh copy.",
        ),
        _ => Friendly {
            message: err.to_string(),
            hint: None,
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_not_found() {
        let err = Error::Io(io::Error::new(ErrorKind::NotFound, "gone"));
        let friendly = explain(&err, Path::new("docs/report.pdf"));
        assert_eq!(friendly.message, "Could not find the file: docs/report.pdf");
        assert!(friendly.hint.is_some());
    }

    #[test]
    fn test_invalid_pdf_uses_file_name() {
        let path = PathBuf::from("docs/fake.pdf");
        let friendly = explain(&Error::InvalidPdf(path.clone()), &path);
        assert!(friendly.message.starts_with("The file 'fake.pdf'"));
    }

    #[test]
    fn test_yaml_location() {
        let err = pdfmark::Config::from_yaml_str("output: [unclosed").unwrap_err();
        let friendly = explain(&err, Path::new("config.yaml"));
        assert!(friendly.message.contains("config.yaml"));
        assert!(friendly.message.contains("line"));
    }

    #[test]
    fn test_no_pdfs_found() {
        let friendly = explain(
            &Error::NoPdfsFound(PathBuf::from("input/pdfs")),
            Path::new("input/pdfs"),
        );
        assert_eq!(friendly.message, "No PDF files found in: input/pdfs");
        assert!(friendly.hint.unwrap().contains("--pdf"));
    }

    #[test]
    fn test_other_has_no_hint() {
        let friendly = explain(&Error::Cancelled, Path::new("a.pdf"));
        assert_eq!(friendly.hint, None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("ééé", 2), "éé");
    }
}
