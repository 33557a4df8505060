//! Rendering: text normalization, tables, chunking and Markdown assembly.

mod chunk;
mod formatting;
mod heading;
mod index;
mod markdown;
mod normalize;
mod options;
mod result;
mod table;

pub use chunk::chunk_text;
pub use formatting::{apply_formatting, FormattingOptions};
pub use heading::{HeadingClassifier, HeadingKind};
pub use index::{render_index, IndexEntry};
pub use markdown::{to_markdown, DocumentAssembler};
pub use normalize::{
    dehyphenate, normalize, normalize_characters, normalize_whitespace, NormalizeOptions,
    CHAR_REPLACEMENTS, LIGATURES,
};
pub use options::MarkdownOptions;
pub use result::{AssemblyStats, Conversion};
pub use table::render_table;
