//! Index page listing converted documents.

use std::path::Path;

use crate::model::Document;

/// Summary of one converted file, as listed in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Source file name, e.g. `report.pdf`
    pub file_name: String,
    pub pages: u32,
    pub text_fragments: u32,
    pub tables: u32,
}

impl IndexEntry {
    /// Build an entry from an extracted document.
    pub fn from_document(file_name: impl Into<String>, doc: &Document) -> Self {
        Self {
            file_name: file_name.into(),
            pages: doc.total_pages,
            text_fragments: doc.text_fragments,
            tables: doc.tables,
        }
    }

    /// File name of the Markdown output this entry links to.
    pub fn markdown_name(&self) -> String {
        let stem = Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone());
        format!("{stem}.md")
    }
}

/// Render the `INDEX.md` content for a set of converted files.
pub fn render_index(entries: &[IndexEntry]) -> String {
    let mut out = String::from("# PDF Content Index\n\n");
    for entry in entries {
        out.push_str(&format!("## {}\n", entry.file_name));
        out.push_str(&format!("- Pages: {}\n", entry.pages));
        out.push_str(&format!("- Text blocks: {}\n", entry.text_fragments));
        out.push_str(&format!("- Tables: {}\n", entry.tables));
        out.push_str(&format!(
            "- File: [{}]({})\n\n",
            entry.file_name,
            entry.markdown_name()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index() {
        let entries = vec![IndexEntry {
            file_name: "rules.pdf".into(),
            pages: 12,
            text_fragments: 340,
            tables: 3,
        }];
        assert_eq!(
            render_index(&entries),
            "# PDF Content Index\n\n## rules.pdf\n- Pages: 12\n- Text blocks: 340\n- Tables: 3\n- File: [rules.pdf](rules.md)\n\n"
        );
    }

    #[test]
    fn test_empty_index() {
        assert_eq!(render_index(&[]), "# PDF Content Index\n\n");
    }
}
