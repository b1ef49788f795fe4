//! Indexing and ranking core: normalizer, document store, inverted index,
//! query planning and multi-field scoring.

pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod rank;
pub mod store;
pub mod tokenizer;
pub mod writer;

pub use config::{Bm25Params, FieldWeights, ModelKind, SearchConfig};
pub use error::IndexError;
pub use index::{DocId, Field, InvertedIndex, Posting, TermId};
pub use query::{Query, QueryPlanner};
pub use rank::{Bm25, Ranker, ScoredResult, Scorer, TfIdf};
pub use store::{Document, DocumentStore, NewDocument};
pub use tokenizer::{EnglishNormalizer, Normalizer};
pub use writer::{IndexWriter, SearchIndex};
