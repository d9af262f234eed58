use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::browser::manager::SessionOptions;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default; only malformed numbers are an error.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding vectorizer.json, classifier.json and stopwords.txt
    pub artifact_dir: PathBuf,
    /// Base URL the artifacts can be downloaded from
    pub artifact_url: Option<String>,
    /// Browser waits and executable
    pub session: SessionOptions,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = SessionOptions::default();

        let artifact_dir = lookup("SENTISCOPE_ARTIFACT_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(crate::resources::download::default_artifact_dir);

        let artifact_url = lookup("SENTISCOPE_ARTIFACT_URL").filter(|v| !v.is_empty());

        let chrome_executable = lookup("SENTISCOPE_CHROME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let session = SessionOptions {
            launch_timeout: duration_var(&lookup, "SENTISCOPE_LAUNCH_TIMEOUT_SECS", Duration::from_secs)?
                .unwrap_or(defaults.launch_timeout),
            navigation_timeout: duration_var(&lookup, "SENTISCOPE_NAV_TIMEOUT_SECS", Duration::from_secs)?
                .unwrap_or(defaults.navigation_timeout),
            settle_delay: duration_var(&lookup, "SENTISCOPE_SETTLE_MS", Duration::from_millis)?
                .unwrap_or(defaults.settle_delay),
            node_wait: duration_var(&lookup, "SENTISCOPE_NODE_WAIT_SECS", Duration::from_secs)?
                .unwrap_or(defaults.node_wait),
            poll_interval: duration_var(&lookup, "SENTISCOPE_POLL_MS", Duration::from_millis)?
                .unwrap_or(defaults.poll_interval),
            chrome_executable,
        };

        Ok(Self {
            artifact_dir,
            artifact_url,
            session,
        })
    }

    /// Check that the model artifacts exist.
    /// Call this before any operation that classifies text.
    pub fn require_artifacts(&self) -> Result<()> {
        if !crate::resources::download::artifacts_present(&self.artifact_dir) {
            anyhow::bail!(
                "Model artifacts not found in {}\n\
                 Run `sentiscope download-artifacts` to fetch them,\n\
                 or point SENTISCOPE_ARTIFACT_DIR at a directory containing\n\
                 vectorizer.json and classifier.json.",
                self.artifact_dir.display()
            );
        }
        Ok(())
    }
}

fn duration_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    unit: fn(u64) -> Duration,
) -> Result<Option<Duration>> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => {
            let value = u64::from_str(raw.trim())
                .with_context(|| format!("{key} must be a whole number, got {raw:?}"))?;
            Ok(Some(unit(value)))
        }
        None => Ok(None),
    }
}
