//! Mic-E message-bit decoding.
//!
//! The engine reduces the raw Mic-E destination-callsign bits to a 3-digit
//! code, one digit per message bit: '0' = bit clear, '1' = bit set
//! (standard), '2' = bit set (custom). This module maps the code to the
//! status phrase.

use crate::types::{AprsError, Result};

/// Canonical Mic-E message table.
const MESSAGE_TYPES: &[(&str, &str)] = &[
    ("111", "off duty"),
    ("222", "custom 0"),
    ("110", "en route"),
    ("220", "custom 1"),
    ("101", "in service"),
    ("202", "custom 2"),
    ("100", "returning"),
    ("200", "custom 3"),
    ("011", "committed"),
    ("022", "custom 4"),
    ("010", "special"),
    ("020", "custom 5"),
    ("001", "priority"),
    ("002", "custom 6"),
    ("000", "emergency"),
];

/// Decode a 3-digit Mic-E message-bit code into its status phrase.
///
/// Fails only on an empty code; validating non-empty codes is the engine's
/// job. Codes mixing standard and custom digits are not in the table and
/// yield "unknown".
pub fn mbits_to_message(bits: &str) -> Result<&'static str> {
    if bits.is_empty() {
        return Err(AprsError::InvalidInput("empty Mic-E message-bit code"));
    }
    Ok(MESSAGE_TYPES
        .iter()
        .find(|(code, _)| *code == bits)
        .map(|(_, phrase)| *phrase)
        .unwrap_or("unknown"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
