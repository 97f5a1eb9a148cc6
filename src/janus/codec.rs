//! Janus wire codec
//!
//! Each ZeroMQ message carries exactly one UTF-8 JSON object:
//! ```text
//! {"janus":"create","transaction":"test-create"}
//! ```

use crate::common::{Error, Result};

use super::types::{Request, Response};

/// Encode a request as compact JSON bytes
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(request)?)
}

/// Decode a reply
///
/// Anything that is not a UTF-8 JSON object with a string `janus` key is
/// a decode failure.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::Decode(format!("Invalid UTF-8: {}", e)))?;

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::Decode(format!("Invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(Error::Decode(format!(
            "Expected a JSON object, got: {}",
            truncate(text)
        )));
    }

    serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
}

/// Shorten a payload for error messages
fn truncate(text: &str) -> String {
    const LIMIT: usize = 80;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
