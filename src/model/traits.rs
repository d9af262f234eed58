// Vectorizer and classifier traits: the frozen-model abstraction.
//
// The pipeline only needs "text in, sparse vector out" and "vector in, class
// code out". Keeping those behind traits lets tests drive the pipeline with
// stub classifiers that return a fixed code.

use std::fmt;

/// Sparse feature vector. Entries are sorted by index with no duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// All-zero vector of the given dimensionality.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from `(index, value)` pairs. Duplicate indices are summed,
    /// zero values and indices outside `dim` are dropped.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut merged: std::collections::BTreeMap<usize, f64> = Default::default();
        for (index, value) in entries {
            if index < dim {
                *merged.entry(index).or_insert(0.0) += value;
            }
        }
        Self {
            dim,
            entries: merged.into_iter().filter(|(_, v)| *v != 0.0).collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight row. Weights past the row's end count as zero.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(i, v)| weights.get(*i).map(|w| w * v))
            .sum()
    }
}

/// Sentiment label produced from a raw classifier code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// `0` is the model's negative class; every other code counts as positive.
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            Label::Negative
        } else {
            Label::Positive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fitted text-to-features transform.
pub trait Vectorizer: Send + Sync {
    /// Transform one document. Unknown terms are ignored; an empty document
    /// yields an all-zero vector.
    fn transform(&self, text: &str) -> FeatureVector;

    /// Size of the trained vocabulary.
    fn dimension(&self) -> usize;
}

/// Fitted features-to-class model.
pub trait Classifier: Send + Sync {
    /// Predict the raw class code for one feature vector.
    fn predict(&self, features: &FeatureVector) -> i64;

    /// Expected input width, if the model knows it. Used to cross-check
    /// against the vectorizer at load time.
    fn n_features(&self) -> Option<usize> {
        None
    }
}
