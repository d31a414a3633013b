//! obd-replay: feed a captured BLE packet log through a diagnostics session

use anyhow::{bail, Context, Result};
use clap::Parser;
use replay::{init_logging, parse_capture, render, replay, synthetic_drive, OutputFormat, ReplaySettings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "obd-replay", version, about = "Replay captured OBD-II BLE notifications")]
struct Args {
    /// Capture file, one hex-encoded notification per line
    capture: Option<PathBuf>,

    /// Replay a built-in simulated drive instead of a capture file
    #[arg(long, conflicts_with = "capture")]
    synthetic: bool,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = ReplaySettings::load(args.config.as_deref())?;
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    init_logging(&settings.log_level)?;

    let frames = match (&args.capture, args.synthetic) {
        (Some(path), _) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading capture {}", path.display()))?;
            parse_capture(&text).with_context(|| format!("parsing capture {}", path.display()))?
        }
        (None, true) => synthetic_drive(),
        (None, false) => bail!("no capture file given (pass a path or --synthetic)"),
    };
    info!("Loaded {} notifications", frames.len());

    let report = replay(&frames, settings.session).await?;
    println!("{}", render(&report, settings.format)?);

    Ok(())
}
