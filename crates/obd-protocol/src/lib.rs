//! OBD-II BLE Packet Protocol
//!
//! This crate decodes the 12-byte frames a BLE OBD-II adapter pushes over its
//! data characteristic: XOR framing validation, the closed PID registry with
//! per-PID bounds, and conversion into typed readings.

mod decoder;
mod error;
mod packet;
mod pid;

pub use decoder::{decode, decode_at, Clock, DecodedReading, PacketDecoder, SystemClock};
pub use error::DecodeError;
pub use packet::{checksum, validate_checksum, RawPacket, PACKET_SIZE};
pub use pid::{lookup, ParameterId, Pid, PidCategory, PidInfo};
