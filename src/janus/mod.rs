//! Janus API message types and wire codec
//!
//! Janus speaks JSON: every message is a single object whose `janus`
//! key names the request or reply kind, and whose `transaction` key
//! correlates a reply with the request that triggered it.

pub mod codec;
pub mod types;

pub use codec::{decode_response, encode_request};
pub use types::*;
