//! OBD-II PID Registry
//!
//! The closed set of parameter IDs the BLE adapter reports, with the display
//! name and upper validity bound of each. Unknown IDs are a normal wire state
//! and resolve to `None`.

use serde::{Deserialize, Serialize};

/// Raw 16-bit parameter identifier as carried on the wire
pub type ParameterId = u16;

/// Parameter IDs reported by the BLE OBD-II adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Pid {
    /// Vehicle speed (0x10D)
    Speed = 0x10D,
    /// Engine RPM (0x10C)
    Rpm = 0x10C,
    /// Calculated engine load (0x104)
    EngineLoad = 0x104,
    /// Engine coolant temperature (0x105)
    CoolantTemp = 0x105,
    /// Throttle position (0x111)
    Throttle = 0x111,
    /// Run time since engine start (0x11F)
    Runtime = 0x11F,
    /// Engine fuel rate (0x159)
    EngineFuelRate = 0x159,
    /// Actual engine torque percentage (0x15B)
    EngineTorquePercentage = 0x15B,
    /// Fuel tank level (0x12F)
    FuelLevel = 0x12F,
    /// Intake air temperature (0x10F)
    IntakeTemp = 0x10F,
    /// Ambient air temperature (0x146)
    AmbientTemp = 0x146,
    /// Barometric pressure (0x133)
    Barometric = 0x133,
    /// Distance travelled (0x131)
    Distance = 0x131,
    /// GPS latitude (0xF00A)
    GpsLatitude = 0xF00A,
    /// GPS longitude (0xF00B)
    GpsLongitude = 0xF00B,
    /// GPS altitude (0x000C)
    GpsAltitude = 0x000C,
    /// GPS ground speed (0xF00D)
    GpsSpeed = 0xF00D,
    /// GPS heading (0xF00E)
    GpsHeading = 0xF00E,
    /// GPS satellites in view (0xF00F)
    GpsSatCount = 0xF00F,
    /// GPS time (0xF010)
    GpsTime = 0xF010,
    /// Accelerometer (0xF020)
    Accelerometer = 0xF020,
    /// Gyroscope (0xF021)
    Gyroscope = 0xF021,
}

/// Grouping of PIDs by the subsystem that produces them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PidCategory {
    Engine,
    Fuel,
    Environmental,
    Distance,
    Gps,
    Motion,
}

/// Registry entry for a known PID
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PidInfo {
    pub pid: Pid,
    pub display_name: &'static str,
    /// Inclusive upper bound; the lower bound is always zero
    pub max_valid_value: f64,
}

impl Pid {
    /// Every known PID, in registry order
    pub const ALL: [Pid; 22] = [
        Pid::Speed,
        Pid::Rpm,
        Pid::EngineLoad,
        Pid::CoolantTemp,
        Pid::Throttle,
        Pid::Runtime,
        Pid::EngineFuelRate,
        Pid::EngineTorquePercentage,
        Pid::FuelLevel,
        Pid::IntakeTemp,
        Pid::AmbientTemp,
        Pid::Barometric,
        Pid::Distance,
        Pid::GpsLatitude,
        Pid::GpsLongitude,
        Pid::GpsAltitude,
        Pid::GpsSpeed,
        Pid::GpsHeading,
        Pid::GpsSatCount,
        Pid::GpsTime,
        Pid::Accelerometer,
        Pid::Gyroscope,
    ];

    /// Resolve a raw wire identifier
    pub const fn from_raw(raw: ParameterId) -> Option<Pid> {
        let pid = match raw {
            0x10D => Pid::Speed,
            0x10C => Pid::Rpm,
            0x104 => Pid::EngineLoad,
            0x105 => Pid::CoolantTemp,
            0x111 => Pid::Throttle,
            0x11F => Pid::Runtime,
            0x159 => Pid::EngineFuelRate,
            0x15B => Pid::EngineTorquePercentage,
            0x12F => Pid::FuelLevel,
            0x10F => Pid::IntakeTemp,
            0x146 => Pid::AmbientTemp,
            0x133 => Pid::Barometric,
            0x131 => Pid::Distance,
            0xF00A => Pid::GpsLatitude,
            0xF00B => Pid::GpsLongitude,
            0x000C => Pid::GpsAltitude,
            0xF00D => Pid::GpsSpeed,
            0xF00E => Pid::GpsHeading,
            0xF00F => Pid::GpsSatCount,
            0xF010 => Pid::GpsTime,
            0xF020 => Pid::Accelerometer,
            0xF021 => Pid::Gyroscope,
            _ => return None,
        };
        Some(pid)
    }

    /// Get the raw wire identifier
    pub const fn as_raw(self) -> ParameterId {
        self as ParameterId
    }

    /// Human-readable name
    pub const fn display_name(self) -> &'static str {
        match self {
            Pid::Speed => "Speed",
            Pid::Rpm => "RPM",
            Pid::EngineLoad => "Engine Load",
            Pid::CoolantTemp => "Coolant Temp",
            Pid::Throttle => "Throttle",
            Pid::Runtime => "Runtime",
            Pid::EngineFuelRate => "Engine Fuel Rate",
            Pid::EngineTorquePercentage => "Engine Torque Percentage",
            Pid::FuelLevel => "Fuel Level",
            Pid::IntakeTemp => "Intake Temp",
            Pid::AmbientTemp => "Ambient Temp",
            Pid::Barometric => "Barometric",
            Pid::Distance => "Distance",
            Pid::GpsLatitude => "GPS Latitude",
            Pid::GpsLongitude => "GPS Longitude",
            Pid::GpsAltitude => "GPS Altitude",
            Pid::GpsSpeed => "GPS Speed",
            Pid::GpsHeading => "GPS Heading",
            Pid::GpsSatCount => "GPS Satellites",
            Pid::GpsTime => "GPS Time",
            Pid::Accelerometer => "Accelerometer",
            Pid::Gyroscope => "Gyroscope",
        }
    }

    /// Largest value accepted for this PID
    pub const fn max_valid_value(self) -> f64 {
        match self {
            Pid::Speed => 1000.0,
            Pid::Rpm => 100_000.0,
            Pid::EngineLoad => 150.0,
            Pid::CoolantTemp => 500.0,
            Pid::Throttle => 1000.0,
            Pid::EngineFuelRate => 1000.0,
            Pid::EngineTorquePercentage => 150.0,
            Pid::FuelLevel => 150.0,
            Pid::IntakeTemp => 1000.0,
            Pid::AmbientTemp => 1000.0,
            Pid::Barometric => 500.0,
            Pid::Distance => 10_000_000.0,
            // Runtime, GPS and motion channels are unbounded
            _ => f64::INFINITY,
        }
    }

    /// Subsystem that reports this PID
    pub const fn category(self) -> PidCategory {
        match self {
            Pid::Speed
            | Pid::Rpm
            | Pid::EngineLoad
            | Pid::CoolantTemp
            | Pid::Throttle
            | Pid::Runtime
            | Pid::EngineFuelRate
            | Pid::EngineTorquePercentage => PidCategory::Engine,
            Pid::FuelLevel => PidCategory::Fuel,
            Pid::IntakeTemp | Pid::AmbientTemp | Pid::Barometric => PidCategory::Environmental,
            Pid::Distance => PidCategory::Distance,
            Pid::GpsLatitude
            | Pid::GpsLongitude
            | Pid::GpsAltitude
            | Pid::GpsSpeed
            | Pid::GpsHeading
            | Pid::GpsSatCount
            | Pid::GpsTime => PidCategory::Gps,
            Pid::Accelerometer | Pid::Gyroscope => PidCategory::Motion,
        }
    }

    /// Full registry entry
    pub const fn info(self) -> PidInfo {
        PidInfo {
            pid: self,
            display_name: self.display_name(),
            max_valid_value: self.max_valid_value(),
        }
    }

    /// Value with the unit the dashboard shows for this PID
    pub fn format_value(self, v: f32) -> String {
        match self {
            Pid::Speed => format!("{v:.0} km/h"),
            Pid::Rpm => format!("{v:.0} RPM"),
            Pid::FuelLevel => format!("{v:.0}%"),
            Pid::CoolantTemp | Pid::IntakeTemp | Pid::AmbientTemp => format!("{v:.0}\u{00B0}C"),
            Pid::EngineLoad | Pid::Throttle | Pid::EngineTorquePercentage => format!("{v:.1}%"),
            Pid::Barometric => format!("{v:.0} kPa"),
            Pid::Distance => format!("{v:.1} km"),
            _ => format!("{v:.2}"),
        }
    }

    /// Check a value against `[0, max_valid_value]`.
    ///
    /// `-0.0` and NaN are rejected; so is infinity, even for unbounded PIDs.
    pub fn accepts(self, value: f32) -> bool {
        value.is_finite()
            && !value.is_sign_negative()
            && f64::from(value) <= self.max_valid_value()
    }
}

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Look up a raw identifier in the registry.
///
/// Returns `None` for anything outside the closed set; that is the unknown-PID
/// path, not an error.
pub fn lookup(id: ParameterId) -> Option<PidInfo> {
    Pid::from_raw(id).map(Pid::info)
}
