use crate::config::FieldWeights;
use crate::tokenizer::Normalizer;
use crate::IndexError;

/// A normalized query: terms in query order plus the field weights to score with.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub terms: Vec<String>,
    pub weights: FieldWeights,
}

/// Turns raw query text into a [`Query`] using the build-time normalizer.
pub struct QueryPlanner<'a> {
    normalizer: &'a dyn Normalizer,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(normalizer: &'a dyn Normalizer) -> Self { Self { normalizer } }

    pub fn plan(&self, raw: &str, weights: FieldWeights) -> Result<Query, IndexError> {
        let terms = self.normalizer.normalize(raw);
        if terms.is_empty() {
            return Err(IndexError::EmptyQuery(raw.to_string()));
        }
        Ok(Query { terms, weights })
    }
}
