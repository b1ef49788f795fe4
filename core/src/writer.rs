use crate::store::{Document, DocumentStore, NewDocument};
use crate::tokenizer::Normalizer;
use crate::{DocId, IndexError, InvertedIndex};
use std::sync::Arc;

/// Single owner of the document store and inverted index during the build.
pub struct IndexWriter {
    normalizer: Arc<dyn Normalizer>,
    store: DocumentStore,
    index: InvertedIndex,
}

impl IndexWriter {
    pub fn new(normalizer: Arc<dyn Normalizer>) -> Self {
        Self { normalizer, store: DocumentStore::new(), index: InvertedIndex::new() }
    }

    pub fn add(&mut self, doc: NewDocument<'_>) -> Result<DocId, IndexError> {
        let analyzed = self.store.add(doc, self.normalizer.as_ref())?;
        for (field, terms) in &analyzed.fields {
            self.index.index(analyzed.doc_id, *field, terms);
        }
        tracing::debug!(doc_id = analyzed.doc_id, location = doc.location, "indexed document");
        Ok(analyzed.doc_id)
    }

    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    /// Seal the build. Statistics are computed here and never change afterwards.
    pub fn finish(self) -> SearchIndex {
        let mut index = self.index;
        index.finish(self.store.len() as u32);
        tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index sealed");
        SearchIndex { analyzer: self.normalizer.name().to_string(), store: self.store, index }
    }
}

/// A completed, read-only index: stored documents plus postings.
///
/// Holds no interior mutability, so an `Arc<SearchIndex>` can be searched
/// from any number of threads.
pub struct SearchIndex {
    pub(crate) analyzer: String,
    pub(crate) store: DocumentStore,
    pub(crate) index: InvertedIndex,
}

impl SearchIndex {
    pub fn analyzer(&self) -> &str { &self.analyzer }

    pub fn store(&self) -> &DocumentStore { &self.store }

    pub fn inverted(&self) -> &InvertedIndex { &self.index }

    pub fn num_docs(&self) -> u32 { self.index.num_docs() }

    pub fn document(&self, doc_id: DocId) -> Result<&Document, IndexError> {
        self.store.get(doc_id).ok_or(IndexError::UnknownDocument(doc_id))
    }

    /// Fail unless `normalizer` is the analyzer the index was built with.
    pub fn check_analyzer(&self, normalizer: &dyn Normalizer) -> Result<(), IndexError> {
        if normalizer.name() == self.analyzer {
            Ok(())
        } else {
            Err(IndexError::AnalyzerMismatch {
                built: self.analyzer.clone(),
                requested: normalizer.name().to_string(),
            })
        }
    }
}
