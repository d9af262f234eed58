// Headless browser sessions: launch, navigate, extract, close.

pub mod chromium;
pub mod manager;
pub mod traits;

use std::fmt;

/// Lifecycle of one browser session.
///
/// Idle → Launching → Navigating → Ready → Extracting → Closing → Closed.
/// Failed can follow Launching, Navigating or Extracting and is always
/// followed by Closing → Closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Launching,
    Navigating,
    Ready,
    Extracting,
    Closing,
    Closed,
    Failed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Launching => "launching",
            SessionPhase::Navigating => "navigating",
            SessionPhase::Ready => "ready",
            SessionPhase::Extracting => "extracting",
            SessionPhase::Closing => "closing",
            SessionPhase::Closed => "closed",
            SessionPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Closed)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
