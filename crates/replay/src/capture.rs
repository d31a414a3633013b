//! Capture file parsing
//!
//! One notification per line as hex, bytes optionally separated by spaces.
//! `#` starts a comment; blank lines are skipped.

use obd_protocol::{Pid, RawPacket};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("line {line}: invalid hex: {source}")]
    InvalidHex {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },
}

/// Parse capture text into raw notification payloads.
///
/// Lengths are not checked here; short frames reach the decoder and are
/// counted as rejections like on a live link.
pub fn parse_capture(text: &str) -> Result<Vec<Vec<u8>>, CaptureError> {
    let mut frames = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let content = raw_line.split('#').next().unwrap_or("");
        let digits: String = content.split_whitespace().collect();
        if digits.is_empty() {
            continue;
        }
        let frame = hex::decode(&digits).map_err(|source| CaptureError::InvalidHex {
            line: index + 1,
            source,
        })?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Format payloads as capture text
pub fn format_capture(frames: &[Vec<u8>]) -> String {
    frames
        .iter()
        .map(|f| hex::encode_upper(f))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A short simulated drive, including frames a live link would drop
pub fn synthetic_drive() -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut time = 0u32;
    let mut push = |pid: u16, value: f32| {
        time += 200;
        frames.push(RawPacket::new(time, pid, 0, value).to_bytes().to_vec());
    };

    push(Pid::FuelLevel.as_raw(), 76.0);
    push(Pid::AmbientTemp.as_raw(), 18.0);
    push(Pid::Barometric.as_raw(), 101.0);
    for step in 0..=13u8 {
        let speed = f32::from(step) * 5.0;
        push(Pid::Speed.as_raw(), speed);
        push(Pid::Rpm.as_raw(), 800.0 + speed * 35.0);
        push(Pid::CoolantTemp.as_raw(), 60.0 + f32::from(step) * 2.0);
        push(Pid::Throttle.as_raw(), 10.0 + f32::from(step));
    }
    push(Pid::GpsLatitude.as_raw(), 47.61);
    push(0xFFFF, 1.0);
    push(Pid::FuelLevel.as_raw(), 75.0);

    let mut corrupted = RawPacket::new(time + 200, Pid::Speed.as_raw(), 0, 999.0).to_bytes();
    corrupted[10] ^= 0x20;
    frames.push(corrupted.to_vec());
    frames.push(vec![0x0D, 0x01, 0x00, 0x00]);

    frames
}
