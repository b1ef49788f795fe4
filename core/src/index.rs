use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub type TermId = u32;
pub type DocId = u32;

/// A separately indexed and separately weighted part of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Body,
    Date,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Body, Field::Date];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Body => "body",
            Field::Date => "date",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Body => 1,
            Field::Date => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

/// Postings and length statistics of a single field.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FieldIndex {
    pub(crate) postings: HashMap<TermId, Vec<Posting>>, // postings sorted by doc_id
    pub(crate) total_length: u64,
    pub(crate) average_length: f64,
}

/// Term dictionary plus per-field postings.
///
/// Filled by [`InvertedIndex::index`] during the build and sealed by
/// [`InvertedIndex::finish`]; afterwards only shared references are handed out.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub(crate) dictionary: HashMap<String, TermId>,
    pub(crate) fields: BTreeMap<Field, FieldIndex>,
    pub(crate) num_docs: u32,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record the normalized terms of one field of one document.
    pub fn index(&mut self, doc_id: DocId, field: Field, terms: &[String]) {
        let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
        for term in terms {
            let next_id = self.dictionary.len() as TermId;
            let tid = *self.dictionary.entry(term.clone()).or_insert(next_id);
            *tf_counts.entry(tid).or_insert(0) += 1;
        }

        let field_index = self.fields.entry(field).or_default();
        field_index.total_length += terms.len() as u64;
        for (tid, tf) in tf_counts {
            let plist = field_index.postings.entry(tid).or_default();
            match plist.binary_search_by_key(&doc_id, |p| p.doc_id) {
                Ok(pos) => plist[pos].term_frequency += tf,
                Err(pos) => plist.insert(pos, Posting { doc_id, term_frequency: tf }),
            }
        }
    }

    /// Fix the corpus size and the average field lengths.
    pub(crate) fn finish(&mut self, num_docs: u32) {
        self.num_docs = num_docs;
        for field_index in self.fields.values_mut() {
            field_index.average_length = if num_docs == 0 {
                0.0
            } else {
                field_index.total_length as f64 / num_docs as f64
            };
        }
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    /// Postings of `term` in `field`, ordered by doc id. Empty when the term never occurs there.
    pub fn postings(&self, term: &str, field: Field) -> &[Posting] {
        self.term_id(term)
            .and_then(|tid| self.fields.get(&field)?.postings.get(&tid))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn document_frequency(&self, term: &str, field: Field) -> u32 {
        self.postings(term, field).len() as u32
    }

    pub fn average_field_length(&self, field: Field) -> f64 {
        self.fields.get(&field).map_or(0.0, |f| f.average_length)
    }

    /// True when at least one document has a token in `field`.
    pub fn has_field(&self, field: Field) -> bool {
        self.fields.get(&field).is_some_and(|f| f.total_length > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> { text.split_whitespace().map(String::from).collect() }

    #[test]
    fn repeated_term_raises_tf_not_df() {
        let mut idx = InvertedIndex::new();
        idx.index(0, Field::Body, &terms("cat dog cat"));
        idx.finish(1);
        assert_eq!(idx.postings("cat", Field::Body), &[Posting { doc_id: 0, term_frequency: 2 }]);
        assert_eq!(idx.document_frequency("cat", Field::Body), 1);
        assert_eq!(idx.document_frequency("dog", Field::Body), 1);
    }

    #[test]
    fn fields_are_independent() {
        let mut idx = InvertedIndex::new();
        idx.index(0, Field::Title, &terms("rust"));
        idx.index(0, Field::Body, &terms("systems programming"));
        idx.finish(1);
        assert_eq!(idx.document_frequency("rust", Field::Title), 1);
        assert_eq!(idx.document_frequency("rust", Field::Body), 0);
        assert!(idx.postings("rust", Field::Date).is_empty());
        assert!(idx.postings("missing", Field::Title).is_empty());
    }

    #[test]
    fn postings_stay_sorted_by_doc_id() {
        let mut idx = InvertedIndex::new();
        idx.index(2, Field::Body, &terms("x"));
        idx.index(0, Field::Body, &terms("x"));
        idx.index(1, Field::Body, &terms("x x"));
        idx.finish(3);
        let ids: Vec<DocId> = idx.postings("x", Field::Body).iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(idx.document_frequency("x", Field::Body), 3);
    }

    #[test]
    fn average_length_counts_every_document() {
        let mut idx = InvertedIndex::new();
        idx.index(0, Field::Body, &terms("a b c d"));
        idx.index(1, Field::Body, &terms("e f"));
        idx.index(0, Field::Date, &terms("2020"));
        idx.finish(2);
        assert_eq!(idx.average_field_length(Field::Body), 3.0);
        assert_eq!(idx.average_field_length(Field::Date), 0.5);
        assert_eq!(idx.average_field_length(Field::Title), 0.0);
        assert!(idx.has_field(Field::Date));
        assert!(!idx.has_field(Field::Title));
    }

    #[test]
    fn empty_corpus_has_zero_averages() {
        let mut idx = InvertedIndex::new();
        idx.finish(0);
        assert_eq!(idx.num_docs(), 0);
        assert_eq!(idx.average_field_length(Field::Body), 0.0);
    }
}
