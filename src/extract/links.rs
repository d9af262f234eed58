// Hyperlink enumeration.

use tracing::info;

use crate::browser::manager::SessionManager;
use crate::error::ExtractionError;

/// Absolute link targets in document order. Duplicates are kept.
pub type HyperlinkSet = Vec<String>;

/// Every resolvable anchor target on the rendered page at `url`.
///
/// Anchors without a destination (no `href`, empty `href`) are skipped;
/// order and repeats follow the document.
pub async fn enumerate_hyperlinks(
    manager: &SessionManager,
    url: &str,
) -> Result<HyperlinkSet, ExtractionError> {
    let links = manager
        .with_session(url, |session| {
            Box::pin(async move {
                let targets = session.anchor_targets().await?;
                Ok::<_, ExtractionError>(resolvable_targets(targets))
            })
        })
        .await?;

    info!(url, count = links.len(), "Enumerated hyperlinks");
    Ok(links)
}

/// Drop anchors that have no usable target, keeping the rest in order.
pub fn resolvable_targets(targets: Vec<Option<String>>) -> HyperlinkSet {
    targets
        .into_iter()
        .flatten()
        .filter(|href| !href.trim().is_empty())
        .collect()
}
