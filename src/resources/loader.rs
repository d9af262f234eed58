// Artifact loading: stopwords, vectorizer and classifier from disk.
//
// The cache talks to an ArtifactLoader rather than the filesystem directly,
// so tests can count loads or inject failures.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::model::linear::{LinearArtifact, LinearClassifier};
use crate::model::pipeline::PipelineResources;
use crate::model::tfidf::{TfIdfArtifact, TfIdfVectorizer};
use crate::model::traits::{Classifier, Vectorizer};
use crate::text::stopwords;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const STOPWORDS_FILE: &str = "stopwords.txt";

/// Source of the three pipeline artifacts. Called from a blocking thread.
pub trait ArtifactLoader: Send + Sync {
    fn load_stopwords(&self) -> Result<HashSet<String>, LoadError>;
    fn load_vectorizer(&self) -> Result<Box<dyn Vectorizer>, LoadError>;
    fn load_classifier(&self) -> Result<Box<dyn Classifier>, LoadError>;
}

/// Load all three artifacts and cross-check them.
pub fn load_all(loader: &dyn ArtifactLoader) -> Result<PipelineResources, LoadError> {
    let stopwords = loader.load_stopwords()?;
    let vectorizer = loader.load_vectorizer()?;
    let classifier = loader.load_classifier()?;
    PipelineResources::new(vectorizer, classifier, stopwords)
}

/// Loads JSON model exports and an optional stopword file from one directory.
pub struct FileArtifactLoader {
    dir: PathBuf,
}

impl FileArtifactLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactLoader for FileArtifactLoader {
    /// Uses `stopwords.txt` when present, otherwise the bundled English list.
    fn load_stopwords(&self) -> Result<HashSet<String>, LoadError> {
        let path = self.dir.join(STOPWORDS_FILE);
        if !path.exists() {
            debug!("No stopword file in {}, using bundled list", self.dir.display());
            return Ok(stopwords::bundled_english());
        }
        let words = stopwords::parse_list(&read_artifact(&path)?);
        info!(count = words.len(), path = %path.display(), "Loaded stopwords");
        Ok(words)
    }

    fn load_vectorizer(&self) -> Result<Box<dyn Vectorizer>, LoadError> {
        let path = self.dir.join(VECTORIZER_FILE);
        let artifact: TfIdfArtifact = parse_artifact(&path)?;
        let vectorizer = TfIdfVectorizer::from_artifact(artifact)?;
        info!(vocabulary = vectorizer.dimension(), "Loaded vectorizer");
        Ok(Box::new(vectorizer))
    }

    fn load_classifier(&self) -> Result<Box<dyn Classifier>, LoadError> {
        let path = self.dir.join(CLASSIFIER_FILE);
        let artifact: LinearArtifact = parse_artifact(&path)?;
        let classifier = LinearClassifier::from_artifact(artifact)?;
        info!(classes = ?classifier.classes(), "Loaded classifier");
        Ok(Box::new(classifier))
    }
}

fn read_artifact(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = read_artifact(path)?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
