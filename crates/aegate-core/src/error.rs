//! Error types for the aegate gateway

use thiserror::Error;

/// Result type alias for aegate operations
pub type AegateResult<T> = Result<T, AegateError>;

/// Main error type for the aegate gateway
#[derive(Error, Debug, Clone)]
pub enum AegateError {
    /// Required configuration (account id, API token) missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream returned a non-2xx response; carries the raw error body
    /// and, for query execution, the fully substituted SQL for diagnosis
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        query: Option<String>,
    },

    /// Network or response-decoding failure talking to the upstream
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AegateError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new upstream-rejection error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            query: None,
        }
    }

    /// Create an upstream-rejection error that records the substituted query
    pub fn upstream_with_query(message: impl Into<String>, query: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            query: Some(query.into()),
        }
    }

    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<reqwest::Error> for AegateError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for AegateError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}
