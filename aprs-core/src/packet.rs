//! The decoded APRS packet record and its derived queries.
//!
//! A `Packet` is built once from a completed engine decode and is plain
//! immutable data afterwards. Everything the engine may omit is an `Option`;
//! a present zero and an absent value are different states.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::engine::EngineFields;
use crate::geo;
use crate::mice;
use crate::types::{AprsError, PacketType, PositionFormat, Result};

/// A decoded APRS packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    // Identity
    pub packet_type: PacketType,
    /// Original packet bytes as received, before any decoding.
    pub raw: Vec<u8>,
    pub header: Option<String>,
    pub body: Option<String>,
    pub src_callsign: Option<String>,
    pub dst_callsign: Option<String>,
    /// Digipeater path in transmission order.
    pub path: Vec<String>,

    // Position
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub pos_format: PositionFormat,
    /// Position resolution in meters.
    pub pos_resolution: Option<f64>,
    /// Trailing position digits intentionally blanked, 0-4.
    pub pos_ambiguity: Option<u8>,
    /// DAO datum byte; 0x00 = undefined.
    pub dao_datum_byte: u8,
    /// Altitude in meters.
    pub altitude: Option<f64>,
    /// Course in degrees, 0-359.
    pub course: Option<u16>,
    /// Speed in km/h.
    pub speed: Option<f64>,

    // Symbol; 0x00 = undefined in both bytes.
    pub symbol_table: u8,
    pub symbol_code: u8,

    // Messaging
    pub messaging: Option<bool>,
    pub destination: Option<String>,
    pub message: Option<String>,
    pub message_ack: Option<String>,
    pub message_nack: Option<String>,
    pub message_id: Option<String>,

    // Narrative
    pub comment: Option<String>,
    pub object_or_item_name: Option<String>,
    /// Object/item create (true) vs. kill (false).
    pub alive: Option<bool>,
    pub gps_fix_status: Option<bool>,
    /// Radio range in km.
    pub radio_range: Option<u32>,
    /// Power-Height-Gain code.
    pub phg: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Timestamp text as it appeared on the air.
    pub raw_timestamp: Option<String>,
    pub nmea_checksum_ok: Option<bool>,

    // Extended
    pub wx_report: Option<String>,
    pub telemetry: Option<String>,
    /// Mic-E message bits, three digits '0'-'2'.
    pub message_bits: Option<String>,
    pub status: Option<String>,
    /// Capability list in engine insertion order.
    pub capabilities: Vec<String>,
}

impl Packet {
    /// Build a record from the engine's flat field set.
    ///
    /// Engine integer constants are translated to the closed enums here and
    /// nowhere else. A record whose recognized type implies a field the
    /// engine did not set is rejected with `DecodeInconsistency`; the error
    /// carries the record, so the caller may still read it as partially
    /// trustworthy data.
    pub fn from_fields(fields: EngineFields) -> Result<Packet> {
        let packet = Packet {
            packet_type: fields
                .packet_type
                .map(PacketType::from_engine)
                .unwrap_or_default(),
            raw: fields.orig_packet.map(String::into_bytes).unwrap_or_default(),
            header: fields.header,
            body: fields.body,
            src_callsign: fields.src_callsign,
            dst_callsign: fields.dst_callsign,
            path: fields.path,
            latitude: fields.latitude,
            longitude: fields.longitude,
            pos_format: fields
                .format
                .map(PositionFormat::from_engine)
                .unwrap_or_default(),
            pos_resolution: fields.pos_resolution,
            pos_ambiguity: fields.pos_ambiguity,
            dao_datum_byte: fields.dao_datum_byte.unwrap_or(0),
            altitude: fields.altitude,
            course: fields.course,
            speed: fields.speed,
            symbol_table: fields.symbol_table.unwrap_or(0),
            symbol_code: fields.symbol_code.unwrap_or(0),
            messaging: fields.messaging,
            destination: fields.destination,
            message: fields.message,
            message_ack: fields.message_ack,
            message_nack: fields.message_nack,
            message_id: fields.message_id,
            comment: fields.comment,
            object_or_item_name: fields.object_or_item_name,
            alive: fields.alive,
            gps_fix_status: fields.gps_fix_status,
            radio_range: fields.radio_range,
            phg: fields.phg,
            timestamp: fields
                .timestamp
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            raw_timestamp: fields.raw_timestamp,
            nmea_checksum_ok: fields.nmea_checksum_ok,
            wx_report: fields.wx_report,
            telemetry: fields.telemetry,
            message_bits: fields.message_bits,
            status: fields.status,
            capabilities: fields.capabilities,
        };
        packet.check_consistency()
    }

    /// Reject a record whose type implies fields the engine left absent.
    fn check_consistency(self) -> Result<Packet> {
        let missing = match self.packet_type {
            PacketType::Location | PacketType::MicE | PacketType::Nmea
                if self.pos_format == PositionFormat::Unknown =>
            {
                Some("position format")
            }
            PacketType::Object | PacketType::Item if self.object_or_item_name.is_none() => {
                Some("object or item name")
            }
            PacketType::Message if self.destination.is_none() => Some("destination"),
            _ => None,
        };
        match missing {
            Some(missing) => Err(AprsError::DecodeInconsistency {
                missing,
                packet: Box::new(self),
            }),
            None => Ok(self),
        }
    }

    /// True if the packet carries location data.
    ///
    /// Format-based: (0, 0) with a real position format is a legitimate
    /// location.
    pub fn has_location(&self) -> bool {
        self.pos_format != PositionFormat::Unknown
    }

    /// The textual Mic-E message, if message bits are present.
    pub fn mic_e_message(&self) -> Option<&'static str> {
        let bits = self.message_bits.as_deref()?;
        mice::mbits_to_message(bits).ok()
    }

    /// Coordinates usable for distance/bearing math.
    ///
    /// A zero coordinate counts as "no reliable fix" for these calculations,
    /// unlike `has_location()` which goes by position format. Both checks
    /// are kept deliberately, each at its own call site.
    fn fix_coords(&self) -> Result<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Ok((lat, lon)),
            _ => Err(AprsError::UndefinedGeometry),
        }
    }

    /// Great-circle distance to another packet's position, in km.
    pub fn distance_km(&self, other: &Packet) -> Result<f64> {
        let (lat1, lon1) = self.fix_coords()?;
        let (lat2, lon2) = other.fix_coords()?;
        Ok(geo::haversine_km(lat1, lon1, lat2, lon2))
    }

    /// Initial great-circle bearing toward another packet's position,
    /// in degrees [0, 360).
    pub fn bearing_deg(&self, other: &Packet) -> Result<f64> {
        let (lat1, lon1) = self.fix_coords()?;
        let (lat2, lon2) = other.fix_coords()?;
        Ok(geo::initial_bearing_deg(lat1, lon1, lat2, lon2))
    }

    /// Compass point toward another packet's position.
    pub fn compass_direction(&self, other: &Packet) -> Result<&'static str> {
        Ok(geo::compass_point(self.bearing_deg(other)?))
    }

    /// Deterministic human-readable summary. Not round-trip parseable.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.packet_type == PacketType::Object {
            writeln!(
                f,
                "{} (via {})",
                self.object_or_item_name.as_deref().unwrap_or("").trim(),
                self.src_callsign.as_deref().unwrap_or("")
            )?;
        } else {
            writeln!(f, "{}", self.src_callsign.as_deref().unwrap_or(""))?;
        }

        if let Some(timestamp) = self.timestamp {
            writeln!(f, "Time: {timestamp}")?;
        }

        if !self.path.is_empty() {
            let quoted: Vec<String> = self.path.iter().map(|hop| format!("{hop:?}")).collect();
            writeln!(f, "Path: [{}]", quoted.join(" "))?;
        }

        if self.has_location() {
            writeln!(
                f,
                "Pos: {:.6},{:.6}",
                self.latitude.unwrap_or(0.0),
                self.longitude.unwrap_or(0.0)
            )?;
        }

        writeln!(f, "Speed: {:.0}km/h", self.speed.unwrap_or(0.0))?;

        if let Some(comment) = self.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            writeln!(f, "Comment: {comment}")?;
        }

        if let Some(status) = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            writeln!(f, "Status: {status}")?;
        }

        if let Some(phrase) = self.mic_e_message() {
            writeln!(f, "Mic-E: {phrase}")?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
