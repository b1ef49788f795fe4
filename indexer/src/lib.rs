//! Build-then-query pipeline behind the `sift` binary.

pub mod build;
pub mod search;

pub use build::{BuildOutcome, IndexBuilder, DOCUMENT_EXTENSIONS};
pub use search::{render_json, render_text, ResultRow, Searcher};
