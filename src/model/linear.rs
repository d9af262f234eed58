// Linear classifier loaded from a JSON export of a fitted model.
//
// Binary models carry a single coefficient row: a positive decision score
// selects classes[1], anything else classes[0]. Multi-class models carry
// one row per class and predict the arg-max row.

use serde::Deserialize;

use super::traits::{Classifier, FeatureVector};
use crate::error::LoadError;

/// On-disk shape of `classifier.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn new(classes: Vec<i64>, coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Result<Self, LoadError> {
        Self::from_artifact(LinearArtifact {
            classes,
            coef,
            intercept,
        })
    }

    /// Check the coefficient matrix, intercepts and classes agree with each other.
    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, LoadError> {
        let LinearArtifact {
            classes,
            coef,
            intercept,
        } = artifact;

        let Some(first) = coef.first() else {
            return Err(LoadError::Invalid("classifier has no coefficient rows".to_string()));
        };
        let width = first.len();
        if coef.iter().any(|row| row.len() != width) {
            return Err(LoadError::Invalid(
                "classifier coefficient rows have differing widths".to_string(),
            ));
        }
        if intercept.len() != coef.len() {
            return Err(LoadError::Invalid(format!(
                "classifier has {} coefficient rows but {} intercepts",
                coef.len(),
                intercept.len()
            )));
        }
        let expected_classes = if coef.len() == 1 { 2 } else { coef.len() };
        if classes.len() != expected_classes {
            return Err(LoadError::Invalid(format!(
                "classifier with {} coefficient rows needs {expected_classes} classes, found {}",
                coef.len(),
                classes.len()
            )));
        }

        Ok(Self {
            classes,
            coef,
            intercept,
        })
    }

    /// Raw decision score per coefficient row.
    pub fn decision_scores(&self, features: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| features.dot(row) + bias)
            .collect()
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &FeatureVector) -> i64 {
        let scores = self.decision_scores(features);
        if scores.len() == 1 {
            return if scores[0] > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            };
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        self.classes[best]
    }

    fn n_features(&self) -> Option<usize> {
        self.coef.first().map(Vec::len)
    }
}
