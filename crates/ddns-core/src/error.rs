//! Error types for the DDNS system
//!
//! Every failure is terminal for the current name/provider pair. Nothing in
//! this crate retries; callers receive the first error verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single `{code, message}` entry from a provider's error list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Provider-specific error code
    #[serde(default)]
    pub code: i64,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// No usable credential after consulting the configuration and environment
    #[error("{0} is not configured: no credential available")]
    Unconfigured(String),

    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with something other than 200
    #[error("{url} responded with unexpected status {status}")]
    UnexpectedStatus {
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The provider answered with a body we cannot parse
    #[error("{url} responded with unexpected Content-Type {content_type:?}")]
    UnexpectedContentType {
        /// Request URL
        url: String,
        /// The Content-Type header received (empty if absent)
        content_type: String,
    },

    /// The provider returned an envelope with `success: false`
    #[error("errors from {url} - {}", join_messages(.errors))]
    Provider {
        /// Request URL
        url: String,
        /// Error list reported by the provider
        errors: Vec<ApiMessage>,
    },

    /// None of the provider's zones is a suffix of the name
    #[error("no zone found for {0}")]
    NoOwningZone(String),

    /// None of the configured providers claims the name
    #[error("no provider owns {0}")]
    NoOwningProvider(String),

    /// Pagination stopped advancing before all items were seen
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn join_messages(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create an "unconfigured" error for the named provider
    pub fn unconfigured(provider: impl Into<String>) -> Self {
        Self::Unconfigured(provider.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an unexpected-status error
    pub fn unexpected_status(url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status,
        }
    }

    /// Create an unexpected-content-type error
    pub fn unexpected_content_type(
        url: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::UnexpectedContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Create a provider envelope error
    pub fn provider(url: impl Into<String>, errors: Vec<ApiMessage>) -> Self {
        Self::Provider {
            url: url.into(),
            errors,
        }
    }

    /// Create a pagination error
    pub fn pagination(msg: impl Into<String>) -> Self {
        Self::Pagination(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
