use std::time::Duration;

use thiserror::Error;

/// Harvester error taxonomy.
///
/// Timeouts carry the description of the condition that was being waited on
/// and the bound that expired, so a failed run says exactly which page state
/// never materialised.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A bounded wait expired before its condition was observed.
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    /// A selector matched nothing outside of any wait.
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// Login submitted but the post-login landmark never appeared.
    #[error("authentication failed for user '{username}': {reason}")]
    Authentication { username: String, reason: String },

    /// Browser / CDP level failure.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// A DOM evaluation returned something we could not interpret.
    #[error("unexpected page state: {0}")]
    Dom(String),

    /// Missing or malformed environment variable.
    #[error("config error: {0}")]
    Config(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        HarvestError::Timeout {
            what: what.into(),
            timeout,
        }
    }

    pub fn element_not_found(selector: impl Into<String>) -> Self {
        HarvestError::ElementNotFound {
            selector: selector.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HarvestError::Timeout { .. })
    }
}

/// Harvester result type.
pub type Result<T> = std::result::Result<T, HarvestError>;
