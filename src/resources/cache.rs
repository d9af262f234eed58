// Load-once cache for the pipeline resources.
//
// One ResourceCache is built at startup and handed to whoever needs the
// model. The first ensure_loaded() does the work; concurrent callers wait
// on the same initialization. A failed load leaves the cell empty so the
// next call retries from scratch.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::loader::{load_all, ArtifactLoader, FileArtifactLoader};
use crate::error::{ClassifyError, LoadError};
use crate::model::pipeline::PipelineResources;

pub struct ResourceCache {
    loader: Arc<dyn ArtifactLoader>,
    cell: OnceCell<Arc<PipelineResources>>,
}

impl ResourceCache {
    pub fn new(loader: Arc<dyn ArtifactLoader>) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    /// Cache backed by JSON artifacts in `dir`.
    pub fn from_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileArtifactLoader::new(dir)))
    }

    /// Load the resources if this is the first successful call, then hand
    /// out the shared handle.
    pub async fn ensure_loaded(&self) -> Result<Arc<PipelineResources>, LoadError> {
        let resources = self
            .cell
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let started = Instant::now();

                // File reads and JSON parsing are blocking work
                let loaded = tokio::task::spawn_blocking(move || load_all(loader.as_ref()))
                    .await
                    .map_err(|e| LoadError::Join(e.to_string()))?;

                match loaded {
                    Ok(resources) => {
                        info!(
                            vocabulary = resources.vocabulary_size(),
                            stopwords = resources.stopwords().len(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Sentiment model loaded"
                        );
                        Ok(Arc::new(resources))
                    }
                    Err(e) => {
                        warn!(error = %e, "Sentiment model failed to load");
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(resources))
    }

    /// The loaded resources, without triggering a load.
    pub fn get(&self) -> Result<Arc<PipelineResources>, ClassifyError> {
        self.cell
            .get()
            .map(Arc::clone)
            .ok_or(ClassifyError::ResourceUnavailable)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
