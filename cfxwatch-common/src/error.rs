// ================================================================
// File: cfxwatch-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The remote resource (message, channel, server) does not exist.
    #[error("Not found error: {0}")]
    NotFound(String),

    /// The bot lacks permission for the resource.
    #[error("Forbidden error: {0}")]
    Forbidden(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other chat-platform failure. Treated as transient.
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Screenshot error: {0}")]
    Screenshot(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True when the failure says the target is gone or off-limits for good,
    /// as opposed to a hiccup worth retrying next tick.
    pub fn is_permanent_miss(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Forbidden(_))
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        // headless_chrome reports everything through anyhow.
        Error::Screenshot(e.to_string())
    }
}
