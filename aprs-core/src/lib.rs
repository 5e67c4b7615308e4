//! aprs-core: typed APRS packet records and their derived computations.
//!
//! No async, no I/O — just the data model. Byte-level packet grammar is the
//! job of an external decoder engine (see [`engine`]); this crate consumes
//! the engine's flat field set and provides the packet record, great-circle
//! geometry between positions, Mic-E status decoding, and rendering.

pub mod engine;
pub mod geo;
pub mod mice;
pub mod packet;
pub mod types;

// Re-export commonly used types at crate root
pub use engine::{DecodeEngine, Engine, EngineFields, EngineOutput, ErrorCode};
pub use packet::Packet;
pub use types::{AprsError, PacketType, PositionFormat, Result};
