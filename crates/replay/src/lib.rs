//! OBD-II Capture Replay
//!
//! Feeds recorded BLE notifications through a diagnostics session exactly as
//! the transport would, and reports the resulting snapshot and packet counts.

mod capture;
mod settings;

pub use capture::{format_capture, parse_capture, synthetic_drive, CaptureError};
pub use settings::{OutputFormat, ReplaySettings};

use diagnostics::{DiagnosticsSnapshot, Session, SessionConfig, SessionError, SessionStats};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Final state after a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub snapshot: DiagnosticsSnapshot,
    pub stats: SessionStats,
}

/// Initialize logging
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let level = Level::from_str(level)?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Run frames through a fresh session in order
pub async fn replay(frames: &[Vec<u8>], config: SessionConfig) -> Result<ReplayReport, SessionError> {
    info!("Replaying {} notifications", frames.len());

    let handle = Session::spawn(config);
    let snapshots = handle.subscribe();
    let sink = handle.sink();

    for frame in frames {
        sink.deliver(frame).await?;
    }

    let stats = handle.shutdown().await?;
    let snapshot = snapshots.borrow().clone();
    Ok(ReplayReport { snapshot, stats })
}

/// Render a report in the requested format
pub fn render(report: &ReplayReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Pretty => Ok(render_pretty(report)),
    }
}

fn render_pretty(report: &ReplayReport) -> String {
    let mut out = String::new();

    match report.snapshot.last_updated_ms {
        Some(ms) => {
            let _ = writeln!(out, "Last update at {ms} ms");
        }
        None => out.push_str("No readings applied\n"),
    }
    for (channel, value) in report.snapshot.channels() {
        let pid = channel.pid();
        let _ = writeln!(out, "{:<26}{}", pid.display_name(), pid.format_value(value));
    }

    let stats = &report.stats;
    let _ = writeln!(
        out,
        "\n{} received, {} applied, {} ignored, {} rejected \
         (too short {}, checksum {}, unknown PID {}, out of range {})",
        stats.received,
        stats.applied,
        stats.ignored,
        stats.rejected(),
        stats.too_short,
        stats.checksum_mismatch,
        stats.unknown_pid,
        stats.out_of_range,
    );
    out
}
