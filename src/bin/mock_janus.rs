//! Mock Janus server for integration testing
//!
//! Binds a ZeroMQ REP socket and answers Janus API requests the way the
//! ZeroMQ transport plugin would, or misbehaves on purpose depending on
//! `--mode`.

use bytes::Bytes;
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use zeromq::{RepSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use janus_probe::common::logging;

/// Reply sent by the transport plugin when it cannot parse a request
const INVALID_JSON_REPLY: &str =
    r#"{"janus":"error","error":{"code":498,"reason":"Invalid JSON"}}"#;

/// Janus error code for unknown requests
const ERROR_UNKNOWN_REQUEST: i64 = 453;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Behave like a healthy server
    Ok,
    /// Refuse session creation
    Error,
    /// Echo the wrong transaction
    WrongTransaction,
    /// Read requests, never reply
    Silent,
    /// Reply with bytes that are not JSON
    Garbage,
    /// Create sessions without returning an id
    NoId,
}

#[derive(Parser)]
#[command(name = "mock_janus", about = "Mock Janus ZeroMQ transport")]
struct Args {
    /// Endpoint to bind
    #[arg(long, default_value = "tcp://127.0.0.1:0")]
    bind: String,

    /// How to answer requests
    #[arg(long, value_enum, default_value = "ok")]
    mode: Mode,
}

#[tokio::main]
async fn main() {
    logging::init_mock();
    let args = Args::parse();

    let mut socket = RepSocket::new();
    let endpoint = match socket.bind(&args.bind).await {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("Could not bind {}: {}", args.bind, e);
            std::process::exit(1);
        }
    };
    println!("listening at: {}", endpoint);

    let mut state = MockState::new(args.mode);

    loop {
        let message = match socket.recv().await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Receive failed: {}", e);
                continue;
            }
        };

        let payload: Vec<u8> = message.into_vec().concat();
        let Some(reply) = state.process(&payload) else {
            tracing::info!("Holding reply back");
            std::future::pending::<()>().await;
            unreachable!();
        };

        if let Err(e) = socket.send(ZmqMessage::from(Bytes::from(reply))).await {
            tracing::warn!("Send failed: {}", e);
        }
    }
}

struct MockState {
    mode: Mode,
    next_session: u64,
}

impl MockState {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            next_session: 4_194_304_001,
        }
    }

    /// Build the reply for one request, or None to stay silent
    fn process(&mut self, payload: &[u8]) -> Option<Vec<u8>> {
        if self.mode == Mode::Silent {
            return None;
        }
        if self.mode == Mode::Garbage {
            return Some(b"<html>502 Bad Gateway</html>".to_vec());
        }

        let request: Value = match serde_json::from_slice(payload) {
            Ok(value) => value,
            Err(_) => return Some(INVALID_JSON_REPLY.as_bytes().to_vec()),
        };
        tracing::debug!("Request: {}", request);

        let transaction = match self.mode {
            Mode::WrongTransaction => Value::from("wrong"),
            _ => request.get("transaction").cloned().unwrap_or(Value::Null),
        };

        let reply = match request.get("janus").and_then(Value::as_str) {
            Some("info") => json!({
                "janus": "server_info",
                "transaction": transaction,
                "name": "Janus WebRTC Server",
                "version": 1300,
                "version_string": "1.3.0",
                "transports": {
                    "janus.transport.zeromq": {
                        "name": "JANUS ZeroMQ transport plugin",
                        "version": 1,
                        "version_string": "0.0.1"
                    }
                }
            }),
            Some("create") => match self.mode {
                Mode::Error => json!({
                    "janus": "error",
                    "transaction": transaction,
                    "error": { "code": 403, "reason": "Session creation refused" }
                }),
                Mode::NoId => json!({
                    "janus": "success",
                    "transaction": transaction,
                    "data": {}
                }),
                _ => {
                    let id = self.next_session;
                    self.next_session += 1;
                    json!({
                        "janus": "success",
                        "transaction": transaction,
                        "data": { "id": id }
                    })
                }
            },
            other => json!({
                "janus": "error",
                "transaction": transaction,
                "error": {
                    "code": ERROR_UNKNOWN_REQUEST,
                    "reason": format!("Unknown request '{}'", other.unwrap_or_default())
                }
            }),
        };

        tracing::debug!("Reply: {}", reply);
        Some(reply.to_string().into_bytes())
    }
}
