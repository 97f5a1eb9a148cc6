//! Scripted in-memory transport for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::common::{Error, Result};

use super::Transport;

type Responder = Box<dyn FnMut(&serde_json::Value) -> Option<String> + Send>;

/// Transport that answers each request through a closure
///
/// Returning `None` from the responder leaves the request unanswered, so
/// the next `recv` waits forever.
pub struct MockTransport {
    responder: Responder,
    pending: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<serde_json::Value>>>,
    closed: Arc<Mutex<bool>>,
}

impl MockTransport {
    pub fn new(responder: impl FnMut(&serde_json::Value) -> Option<String> + Send + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            pending: VecDeque::new(),
            sent: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
        }
    }

    /// A peer that behaves like a healthy Janus
    pub fn janus() -> Self {
        Self::new(|request| {
            let tx = request["transaction"].as_str().unwrap_or_default();
            match request["janus"].as_str() {
                Some("info") => Some(format!(
                    r#"{{"janus":"server_info","transaction":"{tx}","name":"Janus WebRTC Server"}}"#
                )),
                Some("create") => Some(format!(
                    r#"{{"janus":"success","transaction":"{tx}","data":{{"id":"abc123"}}}}"#
                )),
                _ => Some(format!(r#"{{"janus":"error","transaction":"{tx}"}}"#)),
            }
        })
    }

    /// Every request sent so far, decoded as JSON
    pub fn sent(&self) -> Arc<Mutex<Vec<serde_json::Value>>> {
        Arc::clone(&self.sent)
    }

    /// Flag set once the transport has been closed
    pub fn closed(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, message: Vec<u8>) -> Result<()> {
        if *self.closed.lock().unwrap() {
            return Err(Error::Send("mock transport is closed".to_string()));
        }
        let request: serde_json::Value = serde_json::from_slice(&message)?;
        if let Some(reply) = (self.responder)(&request) {
            self.pending.push_back(reply.into_bytes());
        }
        self.sent.lock().unwrap().push(request);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<u8>> {
        match self.pending.pop_front() {
            Some(reply) => Ok(reply),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}
