// The entry points a front end calls: classify a review, count a page's
// links, or fetch a post and classify it.
//
// Everything the pipeline needs is passed in at construction. The model
// cache is shared (Arc); browser sessions are created per call.

use std::sync::Arc;

use tracing::info;

use crate::browser::manager::SessionManager;
use crate::browser::traits::Locator;
use crate::error::{AnalyzeError, ClassifyError, ExtractionError, LoadError};
use crate::extract::{enumerate_hyperlinks, extract_node_text, HyperlinkSet};
use crate::model::traits::Label;
use crate::resources::cache::ResourceCache;

pub struct Analyzer {
    cache: Arc<ResourceCache>,
    sessions: SessionManager,
}

impl Analyzer {
    pub fn new(cache: Arc<ResourceCache>, sessions: SessionManager) -> Self {
        Self { cache, sessions }
    }

    /// Make sure the model is loaded. Front ends call this once before
    /// offering classification.
    pub async fn prepare(&self) -> Result<(), LoadError> {
        self.cache.ensure_loaded().await.map(|_| ())
    }

    /// Classify typed text. Blank input is rejected before the model runs.
    pub fn classify_sentiment(&self, text: &str) -> Result<Label, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::EmptyInput);
        }
        let resources = self.cache.get()?;
        Ok(resources.classify(text))
    }

    /// All hyperlink targets on a rendered page.
    pub async fn count_hyperlinks(&self, url: &str) -> Result<HyperlinkSet, ExtractionError> {
        enumerate_hyperlinks(&self.sessions, url).await
    }

    /// Fetch one node's text from a page and classify it.
    ///
    /// The label is present exactly when text was found.
    pub async fn fetch_and_classify(
        &self,
        url: &str,
        locator: &Locator,
    ) -> Result<(Option<String>, Option<Label>), AnalyzeError> {
        // Fail before paying for a browser if the model isn't there
        let resources = self.cache.get()?;

        let text = extract_node_text(&self.sessions, url, locator).await?;
        let label = text.as_deref().map(|t| resources.classify(t));

        if let Some(label) = label {
            info!(url, label = %label, "Classified fetched text");
        }
        Ok((text, label))
    }
}
