//! Document model types for extracted PDF content.
//!
//! The model sits between the PDF collaborator and the Markdown assembler.
//! Pages own their fragments and tables; the document owns its pages and the
//! aggregate counters. Invariants are enforced by the constructors so the
//! layout and rendering code never has to re-check them.

mod document;
mod fragment;
mod table;

pub use document::{Document, Page, DEFAULT_PAGE_HEIGHT};
pub use fragment::{BoundingBox, TextFragment};
pub use table::{Row, Table};
