//! Decoder-engine boundary.
//!
//! The AX.25/TNC2 byte-level grammar lives in an external engine. This
//! module defines the flat field set the engine hands back, the trait the
//! engine implements, and a caller-owned lifecycle wrapper that turns engine
//! output into [`Packet`]s. The core never interprets packet bytes itself.

use serde::{Deserialize, Serialize};

use crate::packet::Packet;
use crate::types::{AprsError, Result};

/// Opaque engine error code. Translate with [`DecodeEngine::explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub i32);

/// The engine's flat decode result: every field it may omit is optional.
///
/// Enumerations arrive as the engine's raw integer codes and the timestamp
/// as Unix seconds; translation to crate types happens once, in
/// [`Packet::from_fields`]. Serializes both ways so engine output can cross
/// a process boundary as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineFields {
    pub packet_type: Option<u32>,
    pub orig_packet: Option<String>,
    pub header: Option<String>,
    pub body: Option<String>,
    pub src_callsign: Option<String>,
    pub dst_callsign: Option<String>,
    pub path: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub format: Option<u32>,
    pub pos_resolution: Option<f64>,
    pub pos_ambiguity: Option<u8>,
    pub dao_datum_byte: Option<u8>,
    pub altitude: Option<f64>,
    pub course: Option<u16>,
    pub speed: Option<f64>,
    pub symbol_table: Option<u8>,
    pub symbol_code: Option<u8>,
    pub messaging: Option<bool>,
    pub destination: Option<String>,
    pub message: Option<String>,
    pub message_ack: Option<String>,
    pub message_nack: Option<String>,
    pub message_id: Option<String>,
    pub comment: Option<String>,
    pub object_or_item_name: Option<String>,
    pub alive: Option<bool>,
    pub gps_fix_status: Option<bool>,
    pub radio_range: Option<u32>,
    pub phg: Option<String>,
    pub timestamp: Option<i64>,
    pub raw_timestamp: Option<String>,
    pub nmea_checksum_ok: Option<bool>,
    pub wx_report: Option<String>,
    pub telemetry: Option<String>,
    pub message_bits: Option<String>,
    pub status: Option<String>,
    pub capabilities: Vec<String>,
}

/// Outcome of one engine call. The engine must set at least one side.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub fields: Option<EngineFields>,
    pub error: Option<ErrorCode>,
}

/// The external decoder engine.
pub trait DecodeEngine {
    /// Decode one raw packet. `strict_ax25` requests AX.25 validation of the
    /// source callsign and path elements; the destination callsign is
    /// validated regardless.
    fn decode(&self, raw: &[u8], strict_ax25: bool) -> EngineOutput;

    /// Translate an opaque error code to a human explanation.
    fn explain(&self, code: ErrorCode) -> String;

    /// One-time setup, run by [`Engine::open`].
    fn init(&mut self) {}

    /// Teardown, run exactly once by [`Engine::close`] or drop.
    fn cleanup(&mut self) {}
}

/// Caller-owned engine lifecycle.
///
/// `open` runs the backend's `init`; `close` (or drop) runs `cleanup`
/// exactly once. Decoding itself is stateless, so one `Engine` can serve
/// any number of `parse` calls.
pub struct Engine<E: DecodeEngine> {
    backend: E,
    open: bool,
}

impl<E: DecodeEngine> Engine<E> {
    pub fn open(mut backend: E) -> Self {
        backend.init();
        Engine {
            backend,
            open: true,
        }
    }

    /// Decode one raw packet into a record.
    ///
    /// An engine error code is propagated as `DecodeEngine` with the
    /// engine's own explanation, never swallowed and never retried. An
    /// engine that returns neither fields nor an error has broken its
    /// contract; that surfaces as `EngineContractViolation` instead of
    /// aborting the process.
    pub fn parse(&self, raw: &[u8], strict_ax25: bool) -> Result<Packet> {
        let output = self.backend.decode(raw, strict_ax25);
        if let Some(code) = output.error {
            return Err(AprsError::DecodeEngine {
                code: code.0,
                message: self.backend.explain(code),
            });
        }
        match output.fields {
            Some(fields) => Packet::from_fields(fields),
            None => Err(AprsError::EngineContractViolation),
        }
    }

    /// Release the engine now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.open {
            self.backend.cleanup();
            self.open = false;
        }
    }
}

impl<E: DecodeEngine> Drop for Engine<E> {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
