// TF-IDF vectorizer loaded from a JSON export of a fitted model.
//
// The artifact carries the trained vocabulary and IDF weights; nothing is
// refit here. Transform follows the usual fitted TF-IDF recipe: lowercase,
// token-pattern split, n-gram counting against the vocabulary, optional
// sublinear tf, multiply by idf, then row normalization.

use std::collections::{BTreeMap, HashMap};

use regex_lite::Regex;
use serde::Deserialize;

use super::traits::{FeatureVector, Vectorizer};
use crate::error::LoadError;

/// Row normalization applied after tf-idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk shape of `vectorizer.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TfIdfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_min_token_len() -> usize {
    2
}

/// A fitted TF-IDF transform.
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    token_pattern: Regex,
}

impl TfIdfVectorizer {
    /// Validate an artifact and compile its token pattern.
    pub fn from_artifact(artifact: TfIdfArtifact) -> Result<Self, LoadError> {
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(LoadError::Invalid(format!(
                "vectorizer ngram_range ({min_n}, {max_n}) is not a valid range"
            )));
        }
        if artifact.min_token_len == 0 {
            return Err(LoadError::Invalid(
                "vectorizer min_token_len must be at least 1".to_string(),
            ));
        }
        let idf_len = artifact.idf.len();
        if let Some((term, index)) = artifact
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= idf_len)
        {
            return Err(LoadError::Invalid(format!(
                "vocabulary term {term:?} has index {index} but idf has {} entries",
                artifact.idf.len()
            )));
        }

        let pattern = format!(r"\b\w{{{},}}\b", artifact.min_token_len);
        let token_pattern = Regex::new(&pattern)
            .map_err(|e| LoadError::Invalid(format!("bad token pattern {pattern}: {e}")))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            ngram_range: artifact.ngram_range,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            token_pattern,
        })
    }

    /// Parse and validate `vectorizer.json` contents.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let artifact: TfIdfArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact).map_err(serde::de::Error::custom)
    }

    fn term_counts(&self, text: &str) -> BTreeMap<usize, f64> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let mut counts = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&gram) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        let mut weighted: Vec<(usize, f64)> = self
            .term_counts(text)
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        let scale = match self.norm {
            Some(Norm::L2) => weighted.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => weighted.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if scale > 0.0 {
            for (_, v) in &mut weighted {
                *v /= scale;
            }
        }

        FeatureVector::from_entries(self.dimension(), weighted)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }
}
