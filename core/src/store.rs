use crate::tokenizer::Normalizer;
use crate::{DocId, Field, IndexError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw field values of a fetched page, as handed to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewDocument<'a> {
    pub location: &'a str,
    pub title: &'a str,
    pub summary: &'a str,
    pub date: Option<&'a str>,
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub location: String,
    pub title: String,
    pub summary: String,
    pub date: String,
    /// Normalized token count per indexed field, addressed by `Field::slot`.
    field_lengths: [u32; 3],
}

impl Document {
    pub fn field_length(&self, field: Field) -> u32 { self.field_lengths[field.slot()] }
}

/// Normalized terms of a freshly stored document, ready for the inverted index.
#[derive(Debug)]
pub struct Analyzed {
    pub doc_id: DocId,
    pub fields: Vec<(Field, Vec<String>)>,
}

/// Stored fields of every document, addressed by dense doc id.
#[derive(Debug, Default)]
pub struct DocumentStore {
    pub(crate) docs: Vec<Document>,
    pub(crate) by_location: HashMap<String, DocId>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub(crate) fn from_parts(docs: Vec<Document>, by_location: HashMap<String, DocId>) -> Self {
        Self { docs, by_location }
    }

    /// Store a document under the next doc id and normalize its indexed fields.
    pub fn add(&mut self, doc: NewDocument<'_>, normalizer: &dyn Normalizer) -> Result<Analyzed, IndexError> {
        if self.by_location.contains_key(doc.location) {
            return Err(IndexError::DuplicateLocation(doc.location.to_string()));
        }
        let doc_id = self.docs.len() as DocId;
        let date = doc.date.unwrap_or_default();

        let fields: Vec<(Field, Vec<String>)> = vec![
            (Field::Title, normalizer.normalize(doc.title)),
            (Field::Body, normalizer.normalize(doc.body)),
            (Field::Date, normalizer.normalize(date)),
        ];
        let mut field_lengths = [0u32; 3];
        for (field, terms) in &fields {
            field_lengths[field.slot()] = terms.len() as u32;
        }

        self.by_location.insert(doc.location.to_string(), doc_id);
        self.docs.push(Document {
            doc_id,
            location: doc.location.to_string(),
            title: doc.title.trim().to_string(),
            summary: doc.summary.trim().to_string(),
            date: date.trim().to_string(),
            field_lengths,
        });
        Ok(Analyzed { doc_id, fields })
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Document> { self.docs.get(doc_id as usize) }

    pub fn lookup(&self, location: &str) -> Option<DocId> { self.by_location.get(location).copied() }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}
