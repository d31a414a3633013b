//! BLE Data Packet Framing
//!
//! The adapter sends one 12-byte frame per characteristic notification:
//!
//! | bytes  | field    | type        |
//! |--------|----------|-------------|
//! | 0..4   | time     | u32 LE      |
//! | 4..6   | pid      | u16 LE      |
//! | 6      | flags    | u8          |
//! | 7      | checksum | u8          |
//! | 8..12  | value    | f32 LE      |
//!
//! The checksum byte is chosen so that the XOR of all twelve bytes is zero.
//! The adapter firmware declares three float slots per packet but only the
//! first fits in the frame; the remaining two are always zero here.

use crate::error::DecodeError;
use crate::pid::{self, ParameterId, PidInfo};

/// Size of a frame on the wire
pub const PACKET_SIZE: usize = 12;

const OFF_TIME: usize = 0;
const OFF_PID: usize = 4;
const OFF_FLAGS: usize = 6;
const OFF_CHECKSUM: usize = 7;
const OFF_VALUE: usize = 8;

/// XOR of the first `min(PACKET_SIZE, len)` bytes
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().take(PACKET_SIZE).fold(0u8, |acc, &b| acc ^ b)
}

/// True when `data` holds a full frame whose bytes XOR to zero
pub fn validate_checksum(data: &[u8]) -> bool {
    data.len() >= PACKET_SIZE && checksum(data) == 0
}

/// A framed, checksum-valid packet before PID resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPacket {
    /// Adapter timestamp (ms since adapter boot)
    pub time: u32,
    pub pid: ParameterId,
    pub flags: u8,
    pub checksum: u8,
    /// Only `values[0]` is carried on the wire
    pub values: [f32; 3],
}

impl RawPacket {
    /// Build a packet with a checksum byte that makes the frame XOR to zero
    pub fn new(time: u32, pid: ParameterId, flags: u8, value: f32) -> Self {
        let mut packet = Self {
            time,
            pid,
            flags,
            checksum: 0,
            values: [value, 0.0, 0.0],
        };
        // With the checksum byte zeroed, the frame XOR is exactly the byte needed
        packet.checksum = checksum(&packet.to_bytes());
        packet
    }

    /// Parse and validate a frame.
    ///
    /// Bytes past [`PACKET_SIZE`] are ignored.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < PACKET_SIZE {
            return Err(DecodeError::TooShort { len: data.len() });
        }

        let residual = checksum(data);
        if residual != 0 {
            return Err(DecodeError::ChecksumMismatch { residual });
        }

        Ok(Self {
            time: u32::from_le_bytes(read_array(data, OFF_TIME)),
            pid: u16::from_le_bytes(read_array(data, OFF_PID)),
            flags: data[OFF_FLAGS],
            checksum: data[OFF_CHECKSUM],
            values: [f32::from_le_bytes(read_array(data, OFF_VALUE)), 0.0, 0.0],
        })
    }

    /// Encode to wire bytes as-is (the stored checksum is not recomputed)
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut buf = [0u8; PACKET_SIZE];
        buf[OFF_TIME..OFF_PID].copy_from_slice(&self.time.to_le_bytes());
        buf[OFF_PID..OFF_FLAGS].copy_from_slice(&self.pid.to_le_bytes());
        buf[OFF_FLAGS] = self.flags;
        buf[OFF_CHECKSUM] = self.checksum;
        buf[OFF_VALUE..PACKET_SIZE].copy_from_slice(&self.values[0].to_le_bytes());
        buf
    }

    /// The value carried on the wire
    pub fn primary_value(&self) -> f32 {
        self.values[0]
    }

    /// Registry entry for this packet's PID, if known
    pub fn pid_info(&self) -> Option<PidInfo> {
        pid::lookup(self.pid)
    }
}

fn read_array<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&data[offset..offset + N]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pid::Pid;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_all_zeros() {
        assert_eq!(checksum(&[0u8; 12]), 0);
    }

    #[test]
    fn test_checksum_single_byte() {
        let mut data = [0u8; 12];
        data[0] = 0xFF;
        assert_eq!(checksum(&data), 0xFF);
    }

    #[test]
    fn test_checksum_xor_pattern() {
        let mut data = [0u8; 12];
        data[0] = 0xAA;
        data[1] = 0x55;
        assert_eq!(checksum(&data), 0xFF);
    }

    #[test]
    fn test_checksum_self_cancelling() {
        let mut data = [0u8; 12];
        data[0] = 0xAB;
        data[1] = 0xAB;
        assert_eq!(checksum(&data), 0);
    }

    #[test]
    fn test_checksum_ignores_trailing_bytes() {
        let mut data = [0u8; 16];
        data[13] = 0x7F;
        assert_eq!(checksum(&data), 0);
    }

    #[test]
    fn test_validate_checksum() {
        let mut data = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0, 0, 0, 0, 0, 0];
        data[11] = checksum(&data[..11]);
        assert!(validate_checksum(&data));

        let bad = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        assert!(!validate_checksum(&bad));

        // Short input never validates, even when it XORs to zero
        assert!(!validate_checksum(&[0u8; 4]));
    }

    #[test]
    fn test_parse_too_short() {
        let err = RawPacket::parse(&[0x01, 0x02, 0x03, 0x04]).unwrap_err();
        assert_eq!(err, DecodeError::TooShort { len: 4 });
    }

    #[test]
    fn test_parse_bad_checksum() {
        // Speed PID, zero value, checksum byte forced to 0xFF
        let data = [0x00, 0x00, 0x00, 0x00, 0x0D, 0x01, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00];
        // 0x0D ^ 0x01 ^ 0xFF = 0xF3
        assert_eq!(
            RawPacket::parse(&data).unwrap_err(),
            DecodeError::ChecksumMismatch { residual: 0xF3 }
        );
    }

    #[test]
    fn test_field_layout() {
        let packet = RawPacket::new(12345, Pid::Speed.as_raw(), 0x02, 65.0);
        let bytes = packet.to_bytes();

        assert_eq!(&bytes[0..4], &12345u32.to_le_bytes());
        assert_eq!(&bytes[4..6], &[0x0D, 0x01]);
        assert_eq!(bytes[6], 0x02);
        assert_eq!(&bytes[8..12], &65.0f32.to_le_bytes());
        assert_eq!(checksum(&bytes), 0);

        let parsed = RawPacket::parse(&bytes).unwrap();
        assert_eq!(parsed, packet);
        assert_eq!(parsed.values[1], 0.0);
        assert_eq!(parsed.values[2], 0.0);
        assert_eq!(parsed.pid_info().map(|i| i.pid), Some(Pid::Speed));
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let packet = RawPacket::new(7, Pid::Rpm.as_raw(), 0, 3000.0);
        let mut data = packet.to_bytes().to_vec();
        data.extend_from_slice(&[0xDE, 0xAD]);
        assert_eq!(RawPacket::parse(&data).unwrap(), packet);
    }

    proptest! {
        #[test]
        fn prop_short_input_is_too_short(data in proptest::collection::vec(any::<u8>(), 0..PACKET_SIZE)) {
            prop_assert_eq!(
                RawPacket::parse(&data).unwrap_err(),
                DecodeError::TooShort { len: data.len() }
            );
        }

        #[test]
        fn prop_validate_iff_xor_zero(data in proptest::collection::vec(any::<u8>(), PACKET_SIZE..=PACKET_SIZE)) {
            let xor = data.iter().fold(0u8, |acc, &b| acc ^ b);
            prop_assert_eq!(validate_checksum(&data), xor == 0);
        }

        #[test]
        fn prop_constructed_frame_round_trips(
            time in any::<u32>(),
            pid in any::<u16>(),
            flags in any::<u8>(),
            bits in any::<u32>(),
        ) {
            let value = f32::from_bits(bits);
            let bytes = RawPacket::new(time, pid, flags, value).to_bytes();
            prop_assert!(validate_checksum(&bytes));

            let parsed = RawPacket::parse(&bytes).unwrap();
            prop_assert_eq!(parsed.time, time);
            prop_assert_eq!(parsed.pid, pid);
            prop_assert_eq!(parsed.flags, flags);
            prop_assert_eq!(parsed.primary_value().to_bits(), bits);
        }

        #[test]
        fn prop_single_bit_flip_is_detected(index in 0..PACKET_SIZE, bit in 0u8..8) {
            let mut bytes = RawPacket::new(1000, Pid::Speed.as_raw(), 0, 42.0).to_bytes();
            bytes[index] ^= 1 << bit;
            let is_checksum_error = matches!(
                RawPacket::parse(&bytes),
                Err(DecodeError::ChecksumMismatch { .. })
            );
            prop_assert!(is_checksum_error);
        }
    }
}
