//! Vehicle Diagnostics Snapshot
//!
//! Latest known value per diagnostic channel. Readings are applied
//! last-write-wins with no smoothing or history.

use obd_protocol::{DecodedReading, Pid};
use serde::{Deserialize, Serialize};

/// Snapshot channels tracked by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Speed,
    Rpm,
    FuelLevel,
    CoolantTemp,
    EngineLoad,
    Throttle,
    IntakeTemp,
    AmbientTemp,
    Barometric,
    Distance,
    Runtime,
    EngineFuelRate,
    EngineTorquePercentage,
}

impl Channel {
    pub const ALL: [Channel; 13] = [
        Channel::Speed,
        Channel::Rpm,
        Channel::FuelLevel,
        Channel::CoolantTemp,
        Channel::EngineLoad,
        Channel::Throttle,
        Channel::IntakeTemp,
        Channel::AmbientTemp,
        Channel::Barometric,
        Channel::Distance,
        Channel::Runtime,
        Channel::EngineFuelRate,
        Channel::EngineTorquePercentage,
    ];

    /// Channel fed by a PID; GPS and motion PIDs have none
    pub fn from_pid(pid: Pid) -> Option<Channel> {
        let channel = match pid {
            Pid::Speed => Channel::Speed,
            Pid::Rpm => Channel::Rpm,
            Pid::FuelLevel => Channel::FuelLevel,
            Pid::CoolantTemp => Channel::CoolantTemp,
            Pid::EngineLoad => Channel::EngineLoad,
            Pid::Throttle => Channel::Throttle,
            Pid::IntakeTemp => Channel::IntakeTemp,
            Pid::AmbientTemp => Channel::AmbientTemp,
            Pid::Barometric => Channel::Barometric,
            Pid::Distance => Channel::Distance,
            Pid::Runtime => Channel::Runtime,
            Pid::EngineFuelRate => Channel::EngineFuelRate,
            Pid::EngineTorquePercentage => Channel::EngineTorquePercentage,
            Pid::GpsLatitude
            | Pid::GpsLongitude
            | Pid::GpsAltitude
            | Pid::GpsSpeed
            | Pid::GpsHeading
            | Pid::GpsSatCount
            | Pid::GpsTime
            | Pid::Accelerometer
            | Pid::Gyroscope => return None,
        };
        Some(channel)
    }

    /// PID that feeds this channel
    pub fn pid(self) -> Pid {
        match self {
            Channel::Speed => Pid::Speed,
            Channel::Rpm => Pid::Rpm,
            Channel::FuelLevel => Pid::FuelLevel,
            Channel::CoolantTemp => Pid::CoolantTemp,
            Channel::EngineLoad => Pid::EngineLoad,
            Channel::Throttle => Pid::Throttle,
            Channel::IntakeTemp => Pid::IntakeTemp,
            Channel::AmbientTemp => Pid::AmbientTemp,
            Channel::Barometric => Pid::Barometric,
            Channel::Distance => Pid::Distance,
            Channel::Runtime => Pid::Runtime,
            Channel::EngineFuelRate => Pid::EngineFuelRate,
            Channel::EngineTorquePercentage => Pid::EngineTorquePercentage,
        }
    }
}

/// One channel changing value, emitted once per applied reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelUpdate {
    pub channel: Channel,
    pub value: f32,
    pub timestamp_ms: u64,
}

/// Current value of every tracked channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsSnapshot {
    pub speed: Option<f32>,
    pub rpm: Option<f32>,
    pub fuel_level: Option<f32>,
    pub coolant_temp: Option<f32>,
    pub engine_load: Option<f32>,
    pub throttle: Option<f32>,
    pub intake_temp: Option<f32>,
    pub ambient_temp: Option<f32>,
    pub barometric: Option<f32>,
    pub distance: Option<f32>,
    pub runtime: Option<f32>,
    pub engine_fuel_rate: Option<f32>,
    pub engine_torque_percentage: Option<f32>,
    /// Timestamp of the last applied reading (Unix ms); `None` until one lands
    pub last_updated_ms: Option<u64>,
}

impl DiagnosticsSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a decoder-validated reading.
    ///
    /// Returns the channel that changed, or `None` for PIDs without a channel.
    /// No bounds checking happens here.
    pub fn apply(&mut self, reading: &DecodedReading) -> Option<Channel> {
        let channel = Channel::from_pid(reading.pid)?;
        *self.slot_mut(channel) = Some(reading.value);
        self.last_updated_ms = Some(reading.timestamp_ms);
        Some(channel)
    }

    /// Current value of a channel
    pub fn get(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::Speed => self.speed,
            Channel::Rpm => self.rpm,
            Channel::FuelLevel => self.fuel_level,
            Channel::CoolantTemp => self.coolant_temp,
            Channel::EngineLoad => self.engine_load,
            Channel::Throttle => self.throttle,
            Channel::IntakeTemp => self.intake_temp,
            Channel::AmbientTemp => self.ambient_temp,
            Channel::Barometric => self.barometric,
            Channel::Distance => self.distance,
            Channel::Runtime => self.runtime,
            Channel::EngineFuelRate => self.engine_fuel_rate,
            Channel::EngineTorquePercentage => self.engine_torque_percentage,
        }
    }

    /// Channels that have a value, in [`Channel::ALL`] order
    pub fn channels(&self) -> impl Iterator<Item = (Channel, f32)> + '_ {
        Channel::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|v| (c, v)))
    }

    /// True until the first reading is applied
    pub fn is_empty(&self) -> bool {
        self.last_updated_ms.is_none()
    }

    /// Forget every value (session reconnect)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut Option<f32> {
        match channel {
            Channel::Speed => &mut self.speed,
            Channel::Rpm => &mut self.rpm,
            Channel::FuelLevel => &mut self.fuel_level,
            Channel::CoolantTemp => &mut self.coolant_temp,
            Channel::EngineLoad => &mut self.engine_load,
            Channel::Throttle => &mut self.throttle,
            Channel::IntakeTemp => &mut self.intake_temp,
            Channel::AmbientTemp => &mut self.ambient_temp,
            Channel::Barometric => &mut self.barometric,
            Channel::Distance => &mut self.distance,
            Channel::Runtime => &mut self.runtime,
            Channel::EngineFuelRate => &mut self.engine_fuel_rate,
            Channel::EngineTorquePercentage => &mut self.engine_torque_percentage,
        }
    }
}

/// Apply a reading to a snapshot; see [`DiagnosticsSnapshot::apply`]
pub fn apply(reading: &DecodedReading, snapshot: &mut DiagnosticsSnapshot) -> Option<Channel> {
    snapshot.apply(reading)
}
