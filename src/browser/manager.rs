// Scoped browser sessions: acquire → navigate → use → release.
//
// with_session() owns the whole lifecycle of one browser. Whatever the body
// does (returns, errors, panics) and however navigation goes, the browser is
// closed before control returns to the caller. Every wait is bounded by a
// timeout from SessionOptions.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Url;
use tracing::{debug, info, warn};

use super::traits::{BrowserLauncher, BrowserSession};
use super::SessionPhase;
use crate::error::ExtractionError;

/// Tunable waits for one browser session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Upper bound on starting the browser process.
    pub launch_timeout: Duration,
    /// Upper bound on navigation plus waiting for `readyState == "complete"`.
    pub navigation_timeout: Duration,
    /// Extra pause after the document is complete, for late scripts.
    pub settle_delay: Duration,
    /// How long node extraction keeps polling for its target.
    pub node_wait: Duration,
    /// Pause between readiness/element polls.
    pub poll_interval: Duration,
    /// Explicit browser binary; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            launch_timeout: Duration::from_secs(20),
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(1000),
            node_wait: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            chrome_executable: None,
        }
    }
}

/// Hands out one fresh browser per request.
pub struct SessionManager {
    launcher: Arc<dyn BrowserLauncher>,
    options: SessionOptions,
}

impl SessionManager {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, options: SessionOptions) -> Self {
        Self { launcher, options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Run `body` against a freshly launched browser that has loaded `url`.
    ///
    /// The browser is closed on every exit path before this returns. A panic
    /// inside `body` is re-raised after the browser has been closed.
    pub async fn with_session<T, F>(&self, url: &str, body: F) -> Result<T, ExtractionError>
    where
        T: Send,
        F: for<'s> FnOnce(&'s mut dyn BrowserSession) -> BoxFuture<'s, Result<T, ExtractionError>>
            + Send,
    {
        let url = validate_url(url)?;
        let mut phases = PhaseLog::new(url.as_str());

        phases.enter(SessionPhase::Launching);
        let launched = bounded(
            self.options.launch_timeout,
            SessionPhase::Launching,
            self.launcher.launch(),
        )
        .await;
        let mut session = match launched {
            Ok(session) => session,
            Err(e) => {
                // Nothing was started, so there is nothing to release
                phases.fail(&e);
                phases.enter(SessionPhase::Closing);
                phases.enter(SessionPhase::Closed);
                return Err(e);
            }
        };

        let outcome = AssertUnwindSafe(self.drive(session.as_mut(), url.as_str(), &mut phases, body))
            .catch_unwind()
            .await;

        phases.enter(SessionPhase::Closing);
        if let Err(e) = session.close().await {
            warn!(url = %url, error = %e, "Browser did not shut down cleanly");
        }
        phases.enter(SessionPhase::Closed);

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    async fn drive<T, F>(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        phases: &mut PhaseLog,
        body: F,
    ) -> Result<T, ExtractionError>
    where
        F: for<'s> FnOnce(&'s mut dyn BrowserSession) -> BoxFuture<'s, Result<T, ExtractionError>>,
    {
        phases.enter(SessionPhase::Navigating);
        if let Err(e) = self.load_page(session, url).await {
            phases.fail(&e);
            return Err(e);
        }
        phases.enter(SessionPhase::Ready);

        phases.enter(SessionPhase::Extracting);
        match body(session).await {
            Ok(value) => Ok(value),
            Err(e) => {
                phases.fail(&e);
                Err(e)
            }
        }
    }

    /// Navigate, then poll until the document reports complete. Both steps
    /// share the navigation budget; the settle delay comes after.
    async fn load_page(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<(), ExtractionError> {
        let poll_interval = self.options.poll_interval;
        let navigation = async {
            session.navigate(url).await?;
            loop {
                let state = session.ready_state().await?;
                if state == "complete" {
                    return Ok::<(), ExtractionError>(());
                }
                debug!(url, state = %state, "Waiting for document to finish loading");
                tokio::time::sleep(poll_interval).await;
            }
        };
        bounded(
            self.options.navigation_timeout,
            SessionPhase::Navigating,
            navigation,
        )
        .await?;

        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
        Ok(())
    }
}

/// Run `fut` with a hard deadline, reporting expiry as a timeout in `phase`.
pub async fn bounded<T>(
    limit: Duration,
    phase: SessionPhase,
    fut: impl Future<Output = Result<T, ExtractionError>>,
) -> Result<T, ExtractionError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ExtractionError::Timeout {
            phase,
            after: limit,
        }),
    }
}

/// Accept only absolute http(s) URLs.
pub fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| ExtractionError::InvalidUrl {
        url: trimmed.to_string(),
        cause: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractionError::InvalidUrl {
            url: trimmed.to_string(),
            cause: format!("unsupported scheme {other:?}, expected http or https"),
        }),
    }
}

/// Tracks and logs phase transitions for one session.
struct PhaseLog {
    url: String,
    current: SessionPhase,
}

impl PhaseLog {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            current: SessionPhase::Idle,
        }
    }

    fn enter(&mut self, next: SessionPhase) {
        debug!(url = %self.url, from = %self.current, to = %next, "Browser session phase");
        self.current = next;
    }

    fn fail(&mut self, error: &ExtractionError) {
        info!(url = %self.url, phase = %self.current, error = %error, "Browser session failed");
        self.current = SessionPhase::Failed;
    }
}
