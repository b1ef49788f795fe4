//! Multi-field ranking: candidate generation, per-field scoring and top-k ordering.
//!
//! Candidate generation and aggregation live in [`Ranker`]; the per-term formula
//! is behind the [`Scorer`] trait so models can be swapped without touching them.

use crate::config::{Bm25Params, ModelKind};
use crate::query::Query;
use crate::{DocId, SearchIndex};
use std::collections::HashMap;

/// Everything a scorer may look at for one (term, document, field) match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermMatch {
    pub tf: u32,
    pub df: u32,
    pub num_docs: u32,
    pub field_len: u32,
    pub avg_field_len: f64,
}

pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, m: &TermMatch) -> f64;
}

/// Okapi BM25 with Lucene's non-negative idf.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bm25 {
    pub params: Bm25Params,
}

impl Bm25 {
    pub fn new(params: Bm25Params) -> Self { Self { params } }
}

impl Scorer for Bm25 {
    fn name(&self) -> &'static str { "bm25" }

    fn score(&self, m: &TermMatch) -> f64 {
        let Bm25Params { k1, b } = self.params;
        let n = m.num_docs as f64;
        let df = m.df as f64;
        let tf = m.tf as f64;
        // IDF: ln((N - df + 0.5) / (df + 0.5) + 1)
        let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
        let rel_len = if m.avg_field_len > 0.0 { m.field_len as f64 / m.avg_field_len } else { 1.0 };
        idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * rel_len))
    }
}

/// Vector-space style weighting: log tf, smoothed idf, 1/sqrt(length) norm.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdf;

impl Scorer for TfIdf {
    fn name(&self) -> &'static str { "tfidf" }

    fn score(&self, m: &TermMatch) -> f64 {
        if m.tf == 0 || m.df == 0 {
            return 0.0;
        }
        let tf = 1.0 + (m.tf as f64).ln();
        let idf = (1.0 + m.num_docs as f64 / m.df as f64).ln();
        let norm = (m.field_len.max(1) as f64).sqrt();
        tf * idf / norm
    }
}

pub fn scorer_for(model: ModelKind, bm25: Bm25Params) -> Box<dyn Scorer> {
    match model {
        ModelKind::Bm25 => Box::new(Bm25::new(bm25)),
        ModelKind::TfIdf => Box::new(TfIdf),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResult {
    pub doc_id: DocId,
    pub score: f64,
}

/// Scores queries against a sealed index. Read-only, so it can be shared freely.
pub struct Ranker<'a> {
    index: &'a SearchIndex,
    scorer: &'a dyn Scorer,
}

impl<'a> Ranker<'a> {
    pub fn new(index: &'a SearchIndex, scorer: &'a dyn Scorer) -> Self { Self { index, scorer } }

    /// Top `top_k` documents by score descending, ties broken by ascending doc id.
    pub fn rank(&self, query: &Query, top_k: usize) -> Vec<ScoredResult> {
        let inverted = self.index.inverted();
        let store = self.index.store();
        let num_docs = inverted.num_docs();

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for term in &query.terms {
            for (field, weight) in query.weights.weighted() {
                let postings = inverted.postings(term, field);
                if postings.is_empty() {
                    continue;
                }
                let df = postings.len() as u32;
                let avg_field_len = inverted.average_field_length(field);
                for p in postings {
                    let field_len = store.get(p.doc_id).map_or(0, |d| d.field_length(field));
                    let m = TermMatch { tf: p.term_frequency, df, num_docs, field_len, avg_field_len };
                    *scores.entry(p.doc_id).or_insert(0.0) += weight * self.scorer.score(&m);
                }
            }
        }

        let mut results: Vec<ScoredResult> =
            scores.into_iter().map(|(doc_id, score)| ScoredResult { doc_id, score }).collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        results.truncate(top_k);
        tracing::debug!(scorer = self.scorer.name(), hits = results.len(), "ranked query");
        results
    }
}
