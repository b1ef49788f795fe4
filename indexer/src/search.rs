use anyhow::Result;
use serde::Serialize;
use sift_core::persist::{load_index, IndexPaths};
use sift_core::rank::scorer_for;
use sift_core::{Field, FieldWeights, IndexError, Normalizer, QueryPlanner, Ranker, Scorer, SearchConfig, SearchIndex};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub title: String,
    pub summary: String,
    pub score: f64,
    pub location: String,
}

/// Query side of a built index. Cheap to share; searching never mutates.
pub struct Searcher {
    index: Arc<SearchIndex>,
    normalizer: Arc<dyn Normalizer>,
    scorer: Box<dyn Scorer>,
    weights: FieldWeights,
    top_k: usize,
}

impl Searcher {
    pub fn open(index_dir: impl AsRef<Path>, normalizer: Arc<dyn Normalizer>, config: SearchConfig) -> Result<Self> {
        let index = load_index(&IndexPaths::new(index_dir))?;
        Ok(Self::new(Arc::new(index), normalizer, config)?)
    }

    pub fn new(index: Arc<SearchIndex>, normalizer: Arc<dyn Normalizer>, config: SearchConfig) -> Result<Self, IndexError> {
        index.check_analyzer(normalizer.as_ref())?;
        config.bm25.validate()?;
        let weights = config
            .weights
            .unwrap_or_else(|| FieldWeights::standard(index.inverted().has_field(Field::Date)));
        let scorer = scorer_for(config.model, config.bm25);
        Ok(Self { index, normalizer, scorer, weights, top_k: config.top_k })
    }

    pub fn weights(&self) -> &FieldWeights { &self.weights }

    pub fn index(&self) -> &SearchIndex { &self.index }

    pub fn search(&self, raw_query: &str) -> Result<Vec<ResultRow>, IndexError> {
        let query = QueryPlanner::new(self.normalizer.as_ref()).plan(raw_query, self.weights.clone())?;
        let hits = Ranker::new(&self.index, self.scorer.as_ref()).rank(&query, self.top_k);
        tracing::info!(query = raw_query, terms = ?query.terms, hits = hits.len(), "search complete");
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                let doc = self.index.document(hit.doc_id)?;
                Ok(ResultRow {
                    rank: i + 1,
                    title: doc.title.clone(),
                    summary: doc.summary.clone(),
                    score: hit.score,
                    location: doc.location.clone(),
                })
            })
            .collect()
    }
}

/// Console layout: one numbered block per result.
pub fn render_text(query: &str, rows: &[ResultRow]) -> String {
    let mut out = format!("Search results for \"{query}\":\n");
    if rows.is_empty() {
        out.push_str("\nNo matching documents.\n");
        return out;
    }
    for row in rows {
        let _ = write!(
            out,
            "\n{}.\nTitle: {}\nSummary: {}\nRelevance Score: {:.4}\nLocation: {}\n",
            row.rank, row.title, row.summary, row.score, row.location
        );
    }
    out
}

pub fn render_json(rows: &[ResultRow]) -> Result<String> { Ok(serde_json::to_string_pretty(rows)?) }
