//! Layout analysis over extracted fragments.
//!
//! - [`reading_order`]: per-page column clustering and ordering
//! - [`margins`]: document-wide running header/footer detection

pub mod margins;
pub mod reading_order;

pub use margins::{comparison_key, detect as detect_headers_footers};
pub use reading_order::{cluster_columns, order as order_fragments, Column};
