//! Error types for the QuickBooks Online API client.

use thiserror::Error;

/// Errors surfaced by QuickBooks Online API calls.
#[derive(Debug, Error)]
pub enum QboError {
    /// The connection settings required for API calls are missing.
    #[error("QuickBooks connection is not configured: set {0}")]
    NotConfigured(String),

    /// Transport-level failure reaching the API.
    #[error("QuickBooks request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a Fault payload.
    #[error("QuickBooks API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The API answered successfully but the body was not the expected shape.
    #[error("Unexpected QuickBooks response: {0}")]
    UnexpectedResponse(String),
}

impl QboError {
    /// Create a new "not configured" error naming the missing variables.
    pub fn not_configured(missing: &[&str]) -> Self {
        Self::NotConfigured(missing.join(" and "))
    }

    /// Create a new API error.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a new unexpected-response error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }
}
