use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// An XPath expression locating one page element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(xpath: impl Into<String>) -> Self {
        Locator(xpath.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Timed out after {seconds}s waiting for {locator}")]
    Timeout { locator: Locator, seconds: u64 },
    #[error("Element {locator} is unavailable: {reason}")]
    ElementUnavailable { locator: Locator, reason: String },
    #[error("Failed to save {}: {reason}", .path.display())]
    Artifact { path: PathBuf, reason: String },
    #[error("Browser session is no longer usable: {0}")]
    SessionLost(String),
    #[error("Failed to launch the browser: {0}")]
    Launch(String),
}

impl AutomationError {
    /// Page-level flakiness worth another attempt. Anything else means the
    /// session cannot continue.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AutomationError::Timeout { .. }
                | AutomationError::ElementUnavailable { .. }
                | AutomationError::Artifact { .. }
        )
    }
}

/// Opens browser sessions against the news site.
#[async_trait]
pub trait Automation: Send + Sync {
    type Session: Session;

    async fn open_session(&self, url: &str) -> Result<Self::Session, AutomationError>;
}

/// One live browser session. Closing consumes it, so it closes at most once.
#[async_trait]
pub trait Session: Send {
    async fn click(&mut self, locator: &Locator) -> Result<(), AutomationError>;

    async fn type_text(
        &mut self,
        locator: &Locator,
        text: &str,
        submit: bool,
    ) -> Result<(), AutomationError>;

    async fn wait_visible(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), AutomationError>;

    async fn read_text(&mut self, locator: &Locator) -> Result<String, AutomationError>;

    async fn read_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, AutomationError>;

    async fn count(&mut self, locator: &Locator) -> Result<usize, AutomationError>;

    async fn screenshot(&mut self, path: &Path) -> Result<(), AutomationError>;

    async fn close(self) -> Result<(), AutomationError>;
}

#[cfg(test)]
mod tests {
    use super::{AutomationError, Locator};

    #[test]
    fn element_failures_are_transient() {
        let timeout = AutomationError::Timeout {
            locator: Locator::new("//h1"),
            seconds: 10,
        };
        let missing = AutomationError::ElementUnavailable {
            locator: Locator::new("//p"),
            reason: "no such element".to_string(),
        };

        assert!(timeout.is_transient());
        assert!(missing.is_transient());
    }

    #[test]
    fn session_failures_are_fatal() {
        assert!(!AutomationError::SessionLost("invalid session id".to_string()).is_transient());
        assert!(!AutomationError::Launch("connection refused".to_string()).is_transient());
    }
}
