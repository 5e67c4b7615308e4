//! Shared types and error enum for aprs-core.

use serde::Serialize;
use thiserror::Error;

use crate::packet::Packet;

/// All errors produced by aprs-core.
#[derive(Debug, Error)]
pub enum AprsError {
    /// The decoder engine rejected or could not parse the input. The code is
    /// opaque; the message is the engine's own explanation for it.
    #[error("decoder engine error {code}: {message}")]
    DecodeEngine { code: i32, message: String },
    /// The engine returned neither a field set nor an error code.
    #[error("decoder engine returned neither a result nor an error code")]
    EngineContractViolation,
    /// The declared packet type implies a field the engine did not set.
    /// Carries the record so the caller may still use it as partially
    /// trustworthy data.
    #[error("inconsistent {} packet: {missing} is absent", .packet.packet_type)]
    DecodeInconsistency {
        missing: &'static str,
        packet: Box<Packet>,
    },
    /// Distance or bearing requested without a usable position on both sides.
    #[error("undefined geometry: latitude or longitude absent or zero")]
    UndefinedGeometry,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A required optional field was absent.
    #[error("field {field} is absent")]
    FieldAbsent { field: &'static str },
}

pub type Result<T> = std::result::Result<T, AprsError>;

/// Fetch a required optional field, failing with `FieldAbsent`.
///
/// `Option` is the field-presence model: presence of a decoded scalar is
/// `is_some()`, a defaulted read is `unwrap_or()`, and this is the checked
/// read. Present-with-zero and absent are distinct states.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(AprsError::FieldAbsent { field })
}

// ---------------------------------------------------------------------------
// Packet type
// ---------------------------------------------------------------------------

/// APRS packet type reported by the decoder engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PacketType {
    #[default]
    Unknown,
    Location,
    Object,
    Item,
    MicE,
    Nmea,
    Wx,
    Message,
    Capabilities,
    Status,
    Telemetry,
    TelemetryMessage,
    DxSpot,
    Experimental,
}

impl PacketType {
    /// Translate the engine's integer constant. This is the only place the
    /// engine's numeric values are interpreted; unrecognized codes map to
    /// `Unknown`.
    pub fn from_engine(code: u32) -> PacketType {
        match code {
            0 => PacketType::Location,
            1 => PacketType::Object,
            2 => PacketType::Item,
            3 => PacketType::MicE,
            4 => PacketType::Nmea,
            5 => PacketType::Wx,
            6 => PacketType::Message,
            7 => PacketType::Capabilities,
            8 => PacketType::Status,
            9 => PacketType::Telemetry,
            10 => PacketType::TelemetryMessage,
            11 => PacketType::DxSpot,
            12 => PacketType::Experimental,
            _ => PacketType::Unknown,
        }
    }
}

impl std::fmt::Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PacketType::Unknown => "Unknown",
            PacketType::Location => "Location",
            PacketType::Object => "Object",
            PacketType::Item => "Item",
            PacketType::MicE => "Mic-E",
            PacketType::Nmea => "NMEA",
            PacketType::Wx => "WX",
            PacketType::Message => "Message",
            PacketType::Capabilities => "Capabilities",
            PacketType::Status => "Status",
            PacketType::Telemetry => "Telemetry",
            PacketType::TelemetryMessage => "Telemetry Message",
            PacketType::DxSpot => "DX Spot",
            PacketType::Experimental => "Experimental",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Position format
// ---------------------------------------------------------------------------

/// How the position was encoded on the air.
///
/// `Unknown` doubles as "no position": a packet has a location iff its
/// format is a real one, regardless of the coordinate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PositionFormat {
    #[default]
    Unknown,
    Compressed,
    Uncompressed,
    MicE,
    Nmea,
}

impl PositionFormat {
    /// Translate the engine's integer constant; unrecognized codes map to
    /// `Unknown`.
    pub fn from_engine(code: u32) -> PositionFormat {
        match code {
            0 => PositionFormat::Compressed,
            1 => PositionFormat::Uncompressed,
            2 => PositionFormat::MicE,
            3 => PositionFormat::Nmea,
            _ => PositionFormat::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_type_from_engine() {
        assert_eq!(PacketType::from_engine(0), PacketType::Location);
        assert_eq!(PacketType::from_engine(3), PacketType::MicE);
        assert_eq!(PacketType::from_engine(12), PacketType::Experimental);
    }

    #[test]
    fn test_packet_type_unrecognized_code() {
        assert_eq!(PacketType::from_engine(13), PacketType::Unknown);
        assert_eq!(PacketType::from_engine(u32::MAX), PacketType::Unknown);
    }

    #[test]
    fn test_packet_type_default_is_unknown() {
        assert_eq!(PacketType::default(), PacketType::Unknown);
    }

    #[test]
    fn test_packet_type_display() {
        assert_eq!(PacketType::MicE.to_string(), "Mic-E");
        assert_eq!(PacketType::TelemetryMessage.to_string(), "Telemetry Message");
        assert_eq!(PacketType::DxSpot.to_string(), "DX Spot");
    }

    #[test]
    fn test_position_format_from_engine() {
        assert_eq!(PositionFormat::from_engine(0), PositionFormat::Compressed);
        assert_eq!(PositionFormat::from_engine(2), PositionFormat::MicE);
        assert_eq!(PositionFormat::from_engine(99), PositionFormat::Unknown);
    }

    #[test]
    fn test_require_present() {
        assert_eq!(require(Some(0.0), "latitude").unwrap(), 0.0);
        assert_eq!(require(Some(false), "alive").unwrap(), false);
    }

    #[test]
    fn test_require_absent() {
        let err = require::<f64>(None, "latitude").unwrap_err();
        assert!(matches!(err, AprsError::FieldAbsent { field: "latitude" }));
    }
}
