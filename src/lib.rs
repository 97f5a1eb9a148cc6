//! Janus probe - a diagnostic client for the Janus ZeroMQ transport
//!
//! Connects a ZeroMQ REQ socket to a Janus server, issues a short,
//! ordered sequence of correlated requests (server info, session
//! creation), and checks that each reply matches its request.

pub mod cli;
pub mod commands;
pub mod common;
pub mod connection;
pub mod janus;
pub mod testing;
pub mod transport;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use connection::Connection;
pub use janus::{Request, RequestKind, Response, SessionId};
