//! Common utilities shared between the probe and the mock peer

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Parse a "listening at:" address from mock peer output.
pub fn parse_listen_address(line: &str) -> Option<String> {
    let addr_start = line.find("listening at:")?;
    let addr = line[addr_start + "listening at:".len()..].trim();
    if addr.is_empty() {
        None
    } else {
        Some(addr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listen_address() {
        assert_eq!(
            parse_listen_address("listening at: tcp://127.0.0.1:40123\n").as_deref(),
            Some("tcp://127.0.0.1:40123")
        );
        assert_eq!(parse_listen_address("listening at:   "), None);
        assert_eq!(parse_listen_address("ready"), None);
    }
}
