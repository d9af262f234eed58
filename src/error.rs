// Error taxonomy for the library seams.
//
// Loading, classification and extraction each get their own enum so callers
// can tell "the model is broken" apart from "the page never loaded". The
// binary wraps all of these in anyhow for display.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::browser::SessionPhase;

/// Model or stopword artifacts missing, unreadable, or inconsistent.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[error("artifact loader task failed: {0}")]
    Join(String),
}

/// Errors raised before or instead of running the classifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("please enter some text to analyze")]
    EmptyInput,

    #[error("sentiment model is not loaded")]
    ResourceUnavailable,
}

/// Browser launch, navigation, or query failure. The browser has already
/// been shut down by the time one of these reaches the caller.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid url {url:?}: {cause}")]
    InvalidUrl { url: String, cause: String },

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to load {url}: {cause}")]
    Navigation { url: String, cause: String },

    #[error("timed out after {after:?} while {phase}")]
    Timeout { phase: SessionPhase, after: Duration },

    #[error("page query failed: {0}")]
    Query(String),

    #[error("failed to shut down browser: {0}")]
    Shutdown(String),
}

impl ExtractionError {
    /// The session phase this error was raised in.
    pub fn phase(&self) -> SessionPhase {
        match self {
            ExtractionError::InvalidUrl { .. } => SessionPhase::Idle,
            ExtractionError::Launch(_) => SessionPhase::Launching,
            ExtractionError::Navigation { .. } => SessionPhase::Navigating,
            ExtractionError::Timeout { phase, .. } => *phase,
            ExtractionError::Query(_) => SessionPhase::Extracting,
            ExtractionError::Shutdown(_) => SessionPhase::Closing,
        }
    }
}

/// Failure of a combined fetch + classify request.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
