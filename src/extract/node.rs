// Targeted node extraction: the text of one element, if it shows up.
//
// Social pages render their content late and change markup often, so a
// locator that never matches is an ordinary outcome (None), not an error.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::browser::manager::SessionManager;
use crate::browser::traits::{BrowserSession, Locator};
use crate::error::ExtractionError;

/// Text of the first node matching `locator` on the page at `url`.
///
/// Polls for up to the manager's `node_wait`. Returns `None` when nothing
/// matched in time or the node has no text.
pub async fn extract_node_text(
    manager: &SessionManager,
    url: &str,
    locator: &Locator,
) -> Result<Option<String>, ExtractionError> {
    let budget = manager.options().node_wait;
    let interval = manager.options().poll_interval;
    let target = locator.clone();

    let text = manager
        .with_session(url, move |session| {
            Box::pin(async move { wait_for_node(session, &target, budget, interval).await })
        })
        .await?;

    match &text {
        Some(t) => info!(url, locator = %locator, chars = t.chars().count(), "Extracted node text"),
        None => info!(url, locator = %locator, "Target node not found"),
    }
    Ok(text)
}

/// Poll `session` for `locator` until it matches or `budget` runs out.
pub async fn wait_for_node(
    session: &mut dyn BrowserSession,
    locator: &Locator,
    budget: Duration,
    interval: Duration,
) -> Result<Option<String>, ExtractionError> {
    let deadline = Instant::now() + budget;
    loop {
        if let Some(text) = session.node_text(locator).await? {
            let trimmed = text.trim();
            return Ok(if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            });
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        debug!(locator = %locator, "Target node not rendered yet");
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}
