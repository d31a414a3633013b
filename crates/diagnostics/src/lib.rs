//! Vehicle Diagnostics Aggregation
//!
//! Maintains the latest value per diagnostic channel from decoded OBD-II BLE
//! packets, and runs one serialized session per adapter connection.

mod error;
mod session;
mod settings;
mod snapshot;
mod transport;

pub use error::{ConfigError, SessionError};
pub use session::{Session, SessionHandle, SessionStats};
pub use settings::{SessionConfig, ENV_PREFIX};
pub use snapshot::{apply, Channel, ChannelUpdate, DiagnosticsSnapshot};
pub use transport::{PacketSink, PeripheralKind, DATA_CHARACTERISTIC_UUID};
