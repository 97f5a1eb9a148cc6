//! Janus API request and reply types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request kinds the probe knows how to issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Server information query
    Info,
    /// Session creation
    Create,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Info => "info",
            RequestKind::Create => "create",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque session identifier handed out by a successful `create`
///
/// Janus uses 64-bit integers, but nothing in the protocol forbids a
/// string, so both are accepted and echoed back in their original form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Number(n) => write!(f, "{n}"),
            SessionId::Text(s) => f.write_str(s),
        }
    }
}

/// A request sent to Janus
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Request kind
    #[serde(rename = "janus")]
    pub kind: RequestKind,
    /// Caller-chosen correlation token, echoed by the server
    pub transaction: String,
    /// Session the request is scoped to, if any
    #[serde(rename = "session_id", skip_serializing_if = "Option::is_none")]
    pub target: Option<SessionId>,
}

impl Request {
    /// Create a request that is not scoped to any session
    pub fn new(kind: RequestKind, transaction: impl Into<String>) -> Self {
        Self {
            kind,
            transaction: transaction.into(),
            target: None,
        }
    }

    /// Create a request scoped to an existing session
    pub fn scoped(kind: RequestKind, transaction: impl Into<String>, session: SessionId) -> Self {
        Self {
            kind,
            transaction: transaction.into(),
            target: Some(session),
        }
    }
}

/// Error object attached to Janus error replies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerError {
    pub code: i64,
    #[serde(default)]
    pub reason: String,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.reason)
    }
}

/// A reply received from Janus
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Reply kind: `server_info`, `success`, `error`, ...
    #[serde(rename = "janus")]
    pub kind: String,
    /// Transaction echoed from the request
    #[serde(default)]
    pub transaction: Option<String>,
    /// Kind-dependent payload
    #[serde(rename = "data", default)]
    pub payload: Option<serde_json::Value>,
    /// Error details on `error` replies, kept raw so an odd shape never
    /// hides the reply kind
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl Response {
    /// Error details, when the reply carries a well-formed error object
    pub fn server_error(&self) -> Option<ServerError> {
        self.error
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Session id from `data.id`, if present and a string or integer
    pub fn session_id(&self) -> Option<SessionId> {
        match self.payload.as_ref()?.get("id")? {
            serde_json::Value::String(s) => Some(SessionId::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_u64().map(SessionId::Number),
            _ => None,
        }
    }
}
