//! Monitor state and its transitions, independent of any UI.

pub mod connection;
pub mod csv_sink;
pub mod display;
pub mod logging;
pub mod monitor;

pub use connection::{ConnectionAction, ConnectionState};
pub use csv_sink::CsvSink;
pub use display::{DisplayBuffer, DisplayLine, LineKind};
pub use logging::{LoggingAction, LoggingState};
pub use monitor::{Monitor, MonitorOptions};
