//! Message transport to the Janus server
//!
//! A transport moves whole messages: one send is one message on the wire,
//! one receive yields one complete message. Framing belongs to the
//! transport; the JSON inside belongs to the caller.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

pub mod zmq;

#[cfg(test)]
pub(crate) mod mock;

pub use zmq::ZmqTransport;

/// A bidirectional message transport
#[async_trait]
pub trait Transport: Send {
    /// Send one message
    async fn send(&mut self, message: Vec<u8>) -> Result<()>;

    /// Wait for the next message
    ///
    /// Implementations wait indefinitely; callers bound the wait.
    async fn recv(&mut self) -> Result<Vec<u8>>;

    /// Release the underlying socket
    async fn close(&mut self);
}

/// A TCP endpoint in ZeroMQ notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Accepts `host:port` or `tcp://host:port`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let rest = match s.split_once("://") {
            Some(("tcp", rest)) => rest,
            Some((scheme, _)) => {
                return Err(Error::connection(
                    s,
                    format!("unsupported scheme '{scheme}', only tcp is supported"),
                ))
            }
            None => s,
        };

        let (host, port) = rest
            .rsplit_once(':')
            .ok_or_else(|| Error::connection(s, "expected host:port"))?;

        if host.is_empty() {
            return Err(Error::connection(s, "missing host"));
        }

        let port = port
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| Error::connection(s, format!("invalid port '{port}'")))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp://{}:{}", self.host, self.port)
    }
}
