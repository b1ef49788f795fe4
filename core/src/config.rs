//! Query-side configuration, passed explicitly to the planner and the ranker.

use crate::{Field, IndexError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Boost multiplier per searchable field. A field with weight 0 is not searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights(BTreeMap<Field, f64>);

impl FieldWeights {
    pub fn empty() -> Self { Self(BTreeMap::new()) }

    /// `title: 0.5, body: 2.0`, plus `date: 0.5` when the index carries dates.
    pub fn standard(with_date: bool) -> Self {
        let mut weights = BTreeMap::from([(Field::Title, 0.5), (Field::Body, 2.0)]);
        if with_date {
            weights.insert(Field::Date, 0.5);
        }
        Self(weights)
    }

    pub fn set(&mut self, field: Field, weight: f64) -> Result<(), IndexError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(IndexError::InvalidWeight { field, weight });
        }
        self.0.insert(field, weight);
        Ok(())
    }

    pub fn with(mut self, field: Field, weight: f64) -> Result<Self, IndexError> {
        self.set(field, weight)?;
        Ok(self)
    }

    pub fn get(&self, field: Field) -> f64 { self.0.get(&field).copied().unwrap_or(0.0) }

    /// Fields that take part in scoring, in `Field` order.
    pub fn weighted(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        self.0.iter().filter(|(_, w)| **w > 0.0).map(|(f, w)| (*f, *w))
    }
}

impl Default for FieldWeights {
    fn default() -> Self { Self::standard(true) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length-normalization strength.
    pub b: f64,
}

impl Bm25Params {
    pub fn new(k1: f64, b: f64) -> Result<Self, IndexError> {
        let params = Self { k1, b };
        params.validate()?;
        Ok(params)
    }

    /// Scores stay non-negative only for `k1 >= 0` and `b` in `[0, 1]`.
    pub fn validate(&self) -> Result<(), IndexError> {
        let Self { k1, b } = *self;
        if k1.is_finite() && k1 >= 0.0 && (0.0..=1.0).contains(&b) {
            Ok(())
        } else {
            Err(IndexError::InvalidBm25 { k1, b })
        }
    }
}

impl Default for Bm25Params {
    fn default() -> Self { Self { k1: 1.2, b: 0.75 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Bm25,
    TfIdf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Explicit weights; `None` picks [`FieldWeights::standard`] for the opened index.
    pub weights: Option<FieldWeights>,
    pub bm25: Bm25Params,
    pub model: ModelKind,
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { weights: None, bm25: Bm25Params::default(), model: ModelKind::Bm25, top_k: 10 }
    }
}
