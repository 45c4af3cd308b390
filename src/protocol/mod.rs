pub mod backend;
pub mod baud;
pub mod line;
pub mod loopback;
pub mod runtime;

pub use backend::{PortInfo, PortReader, SerialBackend, SystemSerial};
pub use baud::BaudRate;
pub use runtime::{PortRuntimeHandle, RuntimeEvent};
