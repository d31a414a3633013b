//! Packet Decoder
//!
//! Turns a raw notification payload into a validated [`DecodedReading`] or a
//! [`DecodeError`] describing why it was dropped.

use crate::error::DecodeError;
use crate::packet::RawPacket;
use crate::pid::Pid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of reading timestamps (Unix ms)
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// A validated diagnostic reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedReading {
    pub pid: Pid,
    pub value: f32,
    /// When the packet was decoded (Unix ms)
    pub timestamp_ms: u64,
}

impl DecodedReading {
    pub fn new(pid: Pid, value: f32, timestamp_ms: u64) -> Self {
        Self {
            pid,
            value,
            timestamp_ms,
        }
    }

    /// Whether the value lies within the PID's valid range
    pub fn is_valid(&self) -> bool {
        self.pid.accepts(self.value)
    }
}

impl fmt::Display for DecodedReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pid.format_value(self.value))
    }
}

/// Decoder with an injectable clock
#[derive(Debug, Clone, Default)]
pub struct PacketDecoder<C = SystemClock> {
    clock: C,
}

impl PacketDecoder<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> PacketDecoder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Decode a notification payload, stamping it with the current clock time
    pub fn decode(&self, data: &[u8]) -> Result<DecodedReading, DecodeError> {
        decode_at(data, self.clock.now_ms())
    }
}

/// Decode a notification payload using wall-clock time
pub fn decode(data: &[u8]) -> Result<DecodedReading, DecodeError> {
    decode_at(data, SystemClock.now_ms())
}

/// Decode a notification payload with an explicit timestamp.
///
/// Checks run in wire order: length, checksum, PID, range.
pub fn decode_at(data: &[u8], timestamp_ms: u64) -> Result<DecodedReading, DecodeError> {
    let packet = RawPacket::parse(data)?;

    let pid = Pid::from_raw(packet.pid).ok_or(DecodeError::UnknownPid(packet.pid))?;

    let value = packet.primary_value();
    if !pid.accepts(value) {
        return Err(DecodeError::OutOfRange {
            pid: packet.pid,
            value,
            max: pid.max_valid_value(),
        });
    }

    Ok(DecodedReading::new(pid, value, timestamp_ms))
}
