//! Error types for the Janus probe
//!
//! Every exchange failure maps to exactly one variant so operators can
//! tell a dead endpoint from a desynchronised one at a glance. Messages
//! carry the expected and actual values wherever there are any.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the probe
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("Cannot connect to {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Send failed: {0}")]
    Send(String),

    #[error("No reply within {millis} ms. Is Janus running with the ZeroMQ transport enabled?")]
    Timeout { millis: u64 },

    #[error("Receive failed: {0}")]
    Receive(String),

    // === Exchange Validation Errors ===
    #[error("Malformed reply: {0}")]
    Decode(String),

    #[error("Transaction mismatch: sent '{expected}', reply carried {actual}")]
    Correlation { expected: String, actual: String },

    #[error("Expected '{expected}' reply, got '{actual}'{}", suffix(.detail))]
    UnexpectedResponse {
        expected: String,
        actual: String,
        detail: Option<String>,
    },

    #[error("Reply is missing field '{0}'")]
    MissingField(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
}

impl Error {
    /// Create a connection error for an endpoint
    pub fn connection(endpoint: impl ToString, reason: impl ToString) -> Self {
        Self::Connection {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a transaction mismatch error
    ///
    /// `actual` is `None` when the reply carried no transaction at all.
    pub fn correlation(expected: &str, actual: Option<&str>) -> Self {
        Self::Correlation {
            expected: expected.to_string(),
            actual: match actual {
                Some(token) => format!("'{token}'"),
                None => "none".to_string(),
            },
        }
    }

    /// Create an unexpected response error
    pub fn unexpected_response(expected: &str, actual: &str, detail: Option<String>) -> Self {
        Self::UnexpectedResponse {
            expected: expected.to_string(),
            actual: actual.to_string(),
            detail,
        }
    }

    /// Name of the failure class, as shown next to a failed case
    pub fn name(&self) -> &'static str {
        match self {
            Error::Connection { .. } => "ConnectionError",
            Error::Send(_) => "SendError",
            Error::Timeout { .. } => "TimeoutError",
            Error::Receive(_) => "ReceiveError",
            Error::Decode(_) => "DecodeError",
            Error::Correlation { .. } => "CorrelationError",
            Error::UnexpectedResponse { .. } => "UnexpectedResponseError",
            Error::MissingField(_) => "MissingFieldError",
            Error::Config(_) | Error::ConfigParse(_) | Error::FileRead { .. } => "ConfigError",
            Error::Io(_) => "IoError",
            Error::Json(_) => "JsonError",
        }
    }
}
