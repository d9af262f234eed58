// Browser session traits: the seam between extraction logic and the
// actual browser.
//
// The Chromium implementation lives in chromium.rs. Tests plug in fake
// sessions that serve canned pages and count close() calls.

use std::fmt;

use async_trait::async_trait;

use crate::error::ExtractionError;

/// Post-text node on X.com status pages.
pub const DEFAULT_POST_TEXT_XPATH: &str = "//div[@data-testid='tweetText']";

/// Structural expression identifying one node in a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    pub fn expression(&self) -> &str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

impl Default for Locator {
    fn default() -> Self {
        Locator::xpath(DEFAULT_POST_TEXT_XPATH)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css:{s}"),
            Locator::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

/// One live browser, exclusively owned by a single request.
#[async_trait]
pub trait BrowserSession: Send {
    /// Open `url` and wait for the initial navigation to commit.
    async fn navigate(&mut self, url: &str) -> Result<(), ExtractionError>;

    /// Current `document.readyState` ("loading", "interactive", "complete").
    async fn ready_state(&mut self) -> Result<String, ExtractionError>;

    /// Resolved `href` of every anchor in document order; `None` for anchors
    /// without a usable target.
    async fn anchor_targets(&mut self) -> Result<Vec<Option<String>>, ExtractionError>;

    /// Rendered text of the first node matching `locator`, or `None` when
    /// nothing matches right now.
    async fn node_text(&mut self, locator: &Locator) -> Result<Option<String>, ExtractionError>;

    /// Shut the browser down. Called exactly once per session.
    async fn close(&mut self) -> Result<(), ExtractionError>;
}

/// Factory for fresh browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ExtractionError>;
}
