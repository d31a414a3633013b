//! Diagnostics Session Actor
//!
//! One task per BLE session owns the snapshot. Notifications are queued in
//! arrival order and decoded/applied one at a time, so the snapshot only ever
//! has a single writer. Readers get copies through watch/broadcast channels.

use crate::error::SessionError;
use crate::settings::SessionConfig;
use crate::snapshot::{ChannelUpdate, DiagnosticsSnapshot};
use crate::transport::PacketSink;
use obd_protocol::{Clock, DecodeError, DecodedReading, PacketDecoder, SystemClock};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Messages accepted by the session actor
#[derive(Debug)]
pub(crate) enum SessionCommand {
    /// Raw payload of one characteristic notification
    Packet(Vec<u8>),
    /// Clear the snapshot (reconnect)
    Reset,
    /// Drain what is queued ahead of this command, then stop
    Shutdown,
}

/// Per-session packet accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Notifications taken off the queue
    pub received: u64,
    /// Readings that changed a snapshot channel
    pub applied: u64,
    /// Valid readings for PIDs without a snapshot channel
    pub ignored: u64,
    pub too_short: u64,
    pub checksum_mismatch: u64,
    pub unknown_pid: u64,
    pub out_of_range: u64,
}

impl SessionStats {
    /// Total packets dropped by the decoder
    pub fn rejected(&self) -> u64 {
        self.too_short + self.checksum_mismatch + self.unknown_pid + self.out_of_range
    }

    fn record_rejection(&mut self, err: &DecodeError) {
        match err {
            DecodeError::TooShort { .. } => self.too_short += 1,
            DecodeError::ChecksumMismatch { .. } => self.checksum_mismatch += 1,
            DecodeError::UnknownPid(_) => self.unknown_pid += 1,
            DecodeError::OutOfRange { .. } => self.out_of_range += 1,
        }
    }
}

/// Entry point for starting diagnostics sessions
pub struct Session;

impl Session {
    /// Start a session stamped with wall-clock time.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config: SessionConfig) -> SessionHandle {
        Self::spawn_with_clock(config, SystemClock)
    }

    /// Start a session with an injected clock
    pub fn spawn_with_clock<C>(config: SessionConfig, clock: C) -> SessionHandle
    where
        C: Clock + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(config.queue_capacity.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(DiagnosticsSnapshot::new());
        let (stats_tx, stats_rx) = watch::channel(SessionStats::default());
        let (updates_tx, _) = broadcast::channel(config.update_capacity.max(1));
        let (readings_tx, _) = broadcast::channel(config.update_capacity.max(1));

        let actor = SessionActor {
            decoder: PacketDecoder::with_clock(clock),
            snapshot: DiagnosticsSnapshot::new(),
            stats: SessionStats::default(),
            log_rejections: config.log_rejections,
            snapshot_tx,
            stats_tx,
            updates_tx: updates_tx.clone(),
            readings_tx: readings_tx.clone(),
        };

        info!(
            "Diagnostics session started (queue={}, updates={})",
            config.queue_capacity, config.update_capacity
        );
        let task = tokio::spawn(actor.run(command_rx));

        SessionHandle {
            commands: command_tx,
            snapshot_rx,
            stats_rx,
            updates_tx,
            readings_tx,
            task,
        }
    }
}

/// Owner-side handle to a running session
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<DiagnosticsSnapshot>,
    stats_rx: watch::Receiver<SessionStats>,
    updates_tx: broadcast::Sender<ChannelUpdate>,
    readings_tx: broadcast::Sender<DecodedReading>,
    task: JoinHandle<SessionStats>,
}

impl SessionHandle {
    /// Push interface for the BLE transport
    pub fn sink(&self) -> PacketSink {
        PacketSink::new(self.commands.clone())
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that changes once per applied reading
    pub fn subscribe(&self) -> watch::Receiver<DiagnosticsSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Per-channel update events from now on
    pub fn updates(&self) -> broadcast::Receiver<ChannelUpdate> {
        self.updates_tx.subscribe()
    }

    /// Every decoded reading from now on, including PIDs without a snapshot channel
    pub fn readings(&self) -> broadcast::Receiver<DecodedReading> {
        self.readings_tx.subscribe()
    }

    /// Packet counters so far
    pub fn stats(&self) -> SessionStats {
        *self.stats_rx.borrow()
    }

    /// Clear the snapshot after everything queued so far has been applied
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::Reset)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Stop the session once the queue ahead of this call is drained.
    ///
    /// Returns the final counters.
    pub async fn shutdown(self) -> Result<SessionStats, SessionError> {
        // A closed queue means the actor already stopped; its stats are in the task result
        let _ = self.commands.send(SessionCommand::Shutdown).await;
        self.task
            .await
            .map_err(|e| SessionError::TaskFailed(e.to_string()))
    }
}

struct SessionActor<C> {
    decoder: PacketDecoder<C>,
    snapshot: DiagnosticsSnapshot,
    stats: SessionStats,
    log_rejections: bool,
    snapshot_tx: watch::Sender<DiagnosticsSnapshot>,
    stats_tx: watch::Sender<SessionStats>,
    updates_tx: broadcast::Sender<ChannelUpdate>,
    readings_tx: broadcast::Sender<DecodedReading>,
}

impl<C: Clock> SessionActor<C> {
    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> SessionStats {
        while let Some(command) = commands.recv().await {
            match command {
                SessionCommand::Packet(data) => self.handle_packet(&data),
                SessionCommand::Reset => self.reset(),
                SessionCommand::Shutdown => break,
            }
        }

        info!(
            "Diagnostics session stopped: {} received, {} applied, {} rejected",
            self.stats.received,
            self.stats.applied,
            self.stats.rejected()
        );
        self.stats
    }

    fn handle_packet(&mut self, data: &[u8]) {
        self.stats.received += 1;
        metrics::counter!("obd_packets_received_total").increment(1);

        match self.decoder.decode(data) {
            Ok(reading) => {
                // No subscribers is fine
                let _ = self.readings_tx.send(reading);
                self.apply_reading(&reading);
            }
            Err(err) => {
                self.stats.record_rejection(&err);
                metrics::counter!("obd_packets_rejected_total", "reason" => err.kind())
                    .increment(1);
                if self.log_rejections {
                    debug!("Dropped packet ({}): {}", err.kind(), err);
                }
            }
        }

        self.stats_tx.send_replace(self.stats);
    }

    fn apply_reading(&mut self, reading: &DecodedReading) {
        match self.snapshot.apply(reading) {
            Some(channel) => {
                self.stats.applied += 1;
                metrics::counter!("obd_packets_applied_total").increment(1);

                self.snapshot_tx.send_replace(self.snapshot.clone());
                let _ = self.updates_tx.send(ChannelUpdate {
                    channel,
                    value: reading.value,
                    timestamp_ms: reading.timestamp_ms,
                });
            }
            None => {
                self.stats.ignored += 1;
                debug!("No snapshot channel for {}, not applied", reading.pid);
            }
        }
    }

    fn reset(&mut self) {
        info!("Resetting diagnostics snapshot");
        self.snapshot.reset();
        self.snapshot_tx.send_replace(self.snapshot.clone());
    }
}
