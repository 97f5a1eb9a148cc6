//! Connection to the Janus ZeroMQ transport
//!
//! Owns the one socket of a run and walks it through
//! `Unopened -> Open -> Closed`. A REQ socket must alternate send and
//! receive; the connection makes that rule explicit and refuses a second
//! send while a reply is still owed instead of letting it queue.

use std::time::Duration;

use crate::common::{Error, Result};
use crate::transport::{Endpoint, Transport, ZmqTransport};

/// Default receive timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unopened,
    Open,
    Closed,
}

impl State {
    fn as_str(&self) -> &'static str {
        match self {
            State::Unopened => "not open yet",
            State::Open => "open",
            State::Closed => "closed",
        }
    }
}

/// Request/reply connection with a bounded wait per exchange
pub struct Connection<T: Transport> {
    transport: Option<T>,
    state: State,
    timeout: Duration,
    awaiting_reply: bool,
}

impl<T: Transport> Default for Connection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Connection<T> {
    /// Create an unopened connection
    pub fn new() -> Self {
        Self {
            transport: None,
            state: State::Unopened,
            timeout: DEFAULT_TIMEOUT,
            awaiting_reply: false,
        }
    }

    /// Create a connection that is already open over `transport`
    pub fn from_transport(transport: T) -> Self {
        let mut connection = Self::new();
        connection.state = State::Open;
        connection.transport = Some(transport);
        connection
    }

    /// Open the connection over an established transport
    pub fn attach(&mut self, transport: T) -> Result<()> {
        if self.state != State::Unopened {
            return Err(Error::connection(
                "transport",
                format!("connection is {}, it cannot be reopened", self.state.as_str()),
            ));
        }
        self.transport = Some(transport);
        self.state = State::Open;
        Ok(())
    }

    /// Set how long `exchange` waits for a reply
    ///
    /// Takes effect on the next receive.
    pub fn configure_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Send one request and wait for exactly one reply
    ///
    /// After a timeout or a receive failure the socket still owes a
    /// reply, so every further exchange fails with a send error. There is
    /// no retry: a late reply would otherwise be matched to the wrong
    /// request.
    pub async fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        if self.state != State::Open {
            return Err(Error::Send(format!(
                "connection is {}",
                self.state.as_str()
            )));
        }
        if self.awaiting_reply {
            return Err(Error::Send(
                "previous request is still awaiting its reply".to_string(),
            ));
        }
        let transport = self
            .transport
            .as_mut()
            .ok_or_else(|| Error::Send("connection has no transport".to_string()))?;

        transport.send(request.to_vec()).await?;
        self.awaiting_reply = true;

        let reply = match tokio::time::timeout(self.timeout, transport.recv()).await {
            Ok(reply) => reply?,
            Err(_) => {
                let millis = self.timeout.as_millis() as u64;
                tracing::warn!(millis, "Timed out waiting for reply");
                return Err(Error::Timeout { millis });
            }
        };

        self.awaiting_reply = false;
        Ok(reply)
    }

    /// Release the socket. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close().await;
        }
        self.state = State::Closed;
    }
}

impl Connection<ZmqTransport> {
    /// Connect to a Janus ZeroMQ endpoint
    ///
    /// The connect attempt is bounded by the configured timeout.
    pub async fn open(&mut self, endpoint: &Endpoint) -> Result<()> {
        if self.state != State::Unopened {
            return Err(Error::connection(
                endpoint,
                format!("connection is {}, it cannot be reopened", self.state.as_str()),
            ));
        }
        let transport = ZmqTransport::connect(endpoint, self.timeout).await?;
        self.attach(transport)
    }
}
