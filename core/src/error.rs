use crate::{DocId, Field};
use thiserror::Error;

/// Errors raised while building or querying an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The same location reached the document store twice. The frontier
    /// de-duplicates locations, so this indicates a crawler bug.
    #[error("location already indexed: {0}")]
    DuplicateLocation(String),

    #[error("query has no searchable terms: {0:?}")]
    EmptyQuery(String),

    #[error("invalid weight {weight} for field {field}")]
    InvalidWeight { field: Field, weight: f64 },

    #[error("invalid BM25 parameters k1={k1}, b={b}: need finite k1 >= 0 and 0 <= b <= 1")]
    InvalidBm25 { k1: f64, b: f64 },

    #[error("unknown document id {0}")]
    UnknownDocument(DocId),

    #[error("index was built with analyzer {built}, cannot query it with {requested}")]
    AnalyzerMismatch { built: String, requested: String },
}
