// The feature pipeline: normalize → vectorize → predict → label.

use std::collections::HashSet;

use tracing::debug;

use super::traits::{Classifier, Label, Vectorizer};
use crate::error::LoadError;
use crate::output::truncate_chars;
use crate::text::normalize::{normalize, NormalizedTokens};

/// Vectorizer, classifier and stopwords, loaded together and never mutated.
pub struct PipelineResources {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    stopwords: HashSet<String>,
}

impl std::fmt::Debug for PipelineResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineResources")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

/// Intermediate results of one classification, for logging and display.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub normalized: NormalizedTokens,
    pub code: i64,
    pub label: Label,
}

impl PipelineResources {
    /// Bundle loaded artifacts, rejecting a classifier whose input width
    /// doesn't match the vectorizer's vocabulary.
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        stopwords: HashSet<String>,
    ) -> Result<Self, LoadError> {
        if let Some(width) = classifier.n_features() {
            if width != vectorizer.dimension() {
                return Err(LoadError::Invalid(format!(
                    "classifier expects {width} features but vectorizer produces {}",
                    vectorizer.dimension()
                )));
            }
        }
        Ok(Self {
            vectorizer,
            classifier,
            stopwords,
        })
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.dimension()
    }

    pub fn classify(&self, raw: &str) -> Label {
        self.classify_detailed(raw).label
    }

    pub fn classify_detailed(&self, raw: &str) -> Classification {
        let normalized = normalize(raw, &self.stopwords);
        let features = self.vectorizer.transform(normalized.as_str());
        let code = self.classifier.predict(&features);
        let label = Label::from_code(code);

        debug!(
            code,
            label = %label,
            active_features = features.nnz(),
            text_preview = %truncate_chars(raw, 50),
            "Classified text"
        );

        Classification {
            normalized,
            code,
            label,
        }
    }
}
