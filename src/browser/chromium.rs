// Chromium implementation of the browser session traits over CDP.
//
// Each launch starts its own headless Chromium with a throwaway profile
// directory, so concurrent requests never contend for a profile lock. The
// CDP handler runs on a dedicated task owned by the session and is torn
// down in close().

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::manager::SessionOptions;
use super::traits::{BrowserLauncher, BrowserSession, Locator};
use crate::error::ExtractionError;

/// Flags for running inside containers and CI: no GPU, no sandbox, no
/// reliance on a large /dev/shm.
const STABILITY_ARGS: [&str; 8] = [
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-background-networking",
    "--disable-sync",
    "--no-first-run",
    "--no-default-browser-check",
    "--mute-audio",
];

const ANCHOR_TARGETS_SCRIPT: &str = r#"
    Array.from(document.querySelectorAll('a')).map(a =>
        (typeof a.href === 'string' && a.href.length > 0) ? a.href : null
    )
"#;

/// Launches headless Chromium processes.
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
    launch_timeout: Duration,
    request_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn new(options: &SessionOptions) -> Self {
        Self {
            executable: options.chrome_executable.clone(),
            launch_timeout: options.launch_timeout,
            request_timeout: options.navigation_timeout,
        }
    }

    fn config(&self, profile: &TempDir) -> Result<BrowserConfig, ExtractionError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .args(STABILITY_ARGS)
            .user_data_dir(profile.path())
            .launch_timeout(self.launch_timeout)
            .request_timeout(self.request_timeout);

        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ExtractionError::Launch(format!("browser config error: {e}")))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractionError> {
        let profile = tempfile::Builder::new()
            .prefix("sentiscope-profile-")
            .tempdir()
            .map_err(|e| ExtractionError::Launch(format!("failed to create profile dir: {e}")))?;

        let config = self.config(&profile)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExtractionError::Launch(e.to_string()))?;

        // The handler has to be polled for any CDP command to complete.
        // The stream ends once the browser connection closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler error");
                }
            }
        });

        debug!(profile = %profile.path().display(), "Launched headless Chromium");

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            page: None,
            _profile: profile,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
    // Removed from disk when the session is dropped
    _profile: TempDir,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, ExtractionError> {
        self.page
            .as_ref()
            .ok_or_else(|| ExtractionError::Query("no page has been loaded".to_string()))
    }
}

async fn evaluate<T: serde::de::DeserializeOwned>(
    page: &Page,
    script: &str,
) -> Result<T, ExtractionError> {
    page.evaluate(script)
        .await
        .map_err(|e| ExtractionError::Query(e.to_string()))?
        .into_value::<T>()
        .map_err(|e| ExtractionError::Query(format!("unexpected script result: {e}")))
}

/// Result of probing the page for a locator.
#[derive(Deserialize)]
struct NodeProbe {
    found: bool,
    text: Option<String>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractionError> {
        let navigation_error = |e: chromiumoxide::error::CdpError| ExtractionError::Navigation {
            url: url.to_string(),
            cause: e.to_string(),
        };

        let page = self.browser.new_page(url).await.map_err(navigation_error)?;
        page.wait_for_navigation().await.map_err(navigation_error)?;
        self.page = Some(page);
        Ok(())
    }

    async fn ready_state(&mut self) -> Result<String, ExtractionError> {
        evaluate(self.page()?, "document.readyState").await
    }

    async fn anchor_targets(&mut self) -> Result<Vec<Option<String>>, ExtractionError> {
        evaluate(self.page()?, ANCHOR_TARGETS_SCRIPT).await
    }

    async fn node_text(&mut self, locator: &Locator) -> Result<Option<String>, ExtractionError> {
        let probe: NodeProbe = evaluate(self.page()?, &node_probe_script(locator)).await?;
        if !probe.found {
            return Ok(None);
        }
        Ok(Some(probe.text.unwrap_or_default()))
    }

    async fn close(&mut self) -> Result<(), ExtractionError> {
        self.page = None;

        let result = match self.browser.close().await {
            Ok(_) => self
                .browser
                .wait()
                .await
                .map(|_| ())
                .map_err(|e| ExtractionError::Shutdown(e.to_string())),
            Err(e) => {
                warn!(error = %e, "Graceful browser close failed, killing process");
                if let Some(Err(kill_err)) = self.browser.kill().await {
                    warn!(error = %kill_err, "Failed to kill browser process");
                }
                Err(ExtractionError::Shutdown(e.to_string()))
            }
        };

        self.handler_task.abort();
        result
    }
}

/// JavaScript that finds the first node for `locator` and reports its text.
///
/// The expression is embedded as a JSON string literal so quotes inside
/// selectors can't break out of the script.
fn node_probe_script(locator: &Locator) -> String {
    let literal = serde_json::Value::String(locator.expression().to_string()).to_string();
    let lookup = match locator {
        Locator::Css(_) => format!("document.querySelector({literal})"),
        Locator::XPath(_) => format!(
            "document.evaluate({literal}, document, null, \
             XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
        ),
    };
    format!(
        "(() => {{ const el = {lookup}; \
         return {{ found: !!el, text: el ? (el.innerText ?? el.textContent ?? '') : null }}; }})()"
    )
}
