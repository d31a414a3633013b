//! Packet Decode Error Types

use thiserror::Error;

/// Reasons a BLE notification is rejected by the decoder.
///
/// All variants are recoverable: the packet is dropped and the session waits
/// for the next notification.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// Buffer shorter than one frame
    #[error("Packet too short: {len} bytes, need {}", crate::packet::PACKET_SIZE)]
    TooShort { len: usize },

    /// XOR over the frame did not cancel out
    #[error("Checksum mismatch: frame XOR is {residual:02X}, expected 00")]
    ChecksumMismatch { residual: u8 },

    /// Structurally valid frame for a channel that is not modelled
    #[error("Unknown PID {0:#06X}")]
    UnknownPid(u16),

    /// Value outside `[0, max]` for its PID
    #[error("PID {pid:#06X} value {value} is out of range [0, {max}]")]
    OutOfRange { pid: u16, value: f32, max: f64 },
}

/// `OutOfRange` values compare by bit pattern, so a NaN rejection equals itself
impl PartialEq for DecodeError {
    fn eq(&self, other: &Self) -> bool {
        use DecodeError::*;
        match (self, other) {
            (TooShort { len: a }, TooShort { len: b }) => a == b,
            (ChecksumMismatch { residual: a }, ChecksumMismatch { residual: b }) => a == b,
            (UnknownPid(a), UnknownPid(b)) => a == b,
            (
                OutOfRange { pid: pa, value: va, max: ma },
                OutOfRange { pid: pb, value: vb, max: mb },
            ) => pa == pb && va.to_bits() == vb.to_bits() && ma.to_bits() == mb.to_bits(),
            _ => false,
        }
    }
}

impl DecodeError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::TooShort { .. } => "too_short",
            DecodeError::ChecksumMismatch { .. } => "checksum_mismatch",
            DecodeError::UnknownPid(_) => "unknown_pid",
            DecodeError::OutOfRange { .. } => "out_of_range",
        }
    }
}
