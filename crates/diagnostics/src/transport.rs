//! BLE Transport Boundary
//!
//! The Bluetooth stack owns discovery, connection and subscription. Once
//! notifications flow it hands each characteristic value to a [`PacketSink`].

use crate::error::SessionError;
use crate::session::SessionCommand;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

/// GATT data characteristic carrying the 12-byte frames
pub const DATA_CHARACTERISTIC_UUID: &str = "FFE1";

/// Kinds of peripheral the app scans for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralKind {
    /// BLE OBD-II adapter
    ObdAdapter,
    /// BeagleBone data logger
    BeagleBone,
}

impl PeripheralKind {
    /// Advertised service to scan for
    pub fn service_uuid(self) -> &'static str {
        match self {
            PeripheralKind::ObdAdapter => "FFE0",
            PeripheralKind::BeagleBone => "FFEF",
        }
    }

    /// Characteristic to subscribe to for data
    pub fn characteristic_uuid(self) -> &'static str {
        DATA_CHARACTERISTIC_UUID
    }
}

/// Cloneable push handle into a session's packet queue
#[derive(Debug, Clone)]
pub struct PacketSink {
    commands: mpsc::Sender<SessionCommand>,
}

impl PacketSink {
    pub(crate) fn new(commands: mpsc::Sender<SessionCommand>) -> Self {
        Self { commands }
    }

    /// Queue one notification payload, waiting for room
    pub async fn deliver(&self, data: &[u8]) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::Packet(data.to_vec()))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Queue one notification payload from a non-async callback.
    ///
    /// Drops the payload when the queue is full.
    pub fn try_deliver(&self, data: &[u8]) -> Result<(), SessionError> {
        match self.commands.try_send(SessionCommand::Packet(data.to_vec())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("Packet queue full, dropping {}-byte notification", data.len());
                metrics::counter!("obd_packets_dropped_total").increment(1);
                Err(SessionError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(SessionError::Closed),
        }
    }

    /// Whether the session behind this sink has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
