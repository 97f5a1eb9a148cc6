//! ZeroMQ REQ socket transport
//!
//! Janus binds a REP socket; the probe connects a REQ socket to it. The
//! socket itself queues nothing on our behalf: ordering discipline is
//! enforced one level up, in the connection.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use crate::common::{Error, Result};

use super::{Endpoint, Transport};

/// Transport over a single ZeroMQ REQ socket
pub struct ZmqTransport {
    socket: Option<ReqSocket>,
    endpoint: String,
}

impl ZmqTransport {
    /// Connect a REQ socket to `endpoint`
    ///
    /// ZeroMQ keeps retrying a refused connection, so the attempt is
    /// bounded by `timeout`.
    pub async fn connect(endpoint: &Endpoint, timeout: Duration) -> Result<Self> {
        let address = endpoint.to_string();
        let mut socket = ReqSocket::new();

        tracing::debug!(endpoint = %address, "Connecting REQ socket");

        match tokio::time::timeout(timeout, socket.connect(&address)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(Error::connection(&address, e)),
            Err(_) => {
                return Err(Error::connection(
                    &address,
                    format!("not reachable within {} ms", timeout.as_millis()),
                ))
            }
        }

        tracing::info!(endpoint = %address, "Connected");

        Ok(Self {
            socket: Some(socket),
            endpoint: address,
        })
    }

    fn socket(&mut self) -> Result<&mut ReqSocket> {
        self.socket
            .as_mut()
            .ok_or_else(|| Error::Send(format!("socket to {} is closed", self.endpoint)))
    }
}

#[async_trait]
impl Transport for ZmqTransport {
    async fn send(&mut self, message: Vec<u8>) -> Result<()> {
        let len = message.len();
        self.socket()?
            .send(ZmqMessage::from(Bytes::from(message)))
            .await
            .map_err(|e| Error::Send(e.to_string()))?;
        tracing::trace!(bytes = len, "Sent message");
        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<u8>> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| Error::Receive("socket is closed".to_string()))?;

        let message = socket
            .recv()
            .await
            .map_err(|e| Error::Receive(e.to_string()))?;

        let mut frames = message.into_vec();
        if frames.len() != 1 {
            return Err(Error::Receive(format!(
                "expected a single-frame reply, got {} frames",
                frames.len()
            )));
        }
        let body = frames.remove(0).to_vec();
        tracing::trace!(bytes = body.len(), "Received message");
        Ok(body)
    }

    async fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::debug!(endpoint = %self.endpoint, "Closed REQ socket");
        }
    }
}
