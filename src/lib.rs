//! uart_monitor: watch line-delimited text on a serial port and record it.
//!
//! The library holds everything the binary uses: the serial backend and its
//! reader thread (`protocol`), the monitor state machine with CSV session
//! logging (`core`), the terminal frontend (`tui`) and the command line
//! (`cli`). The loopback backend in `protocol::loopback` drives the same
//! state machine without hardware.

#[doc(hidden)]
pub mod boot;
#[doc(hidden)]
pub mod cli;
pub mod core;
pub mod i18n;
pub mod protocol;
#[doc(hidden)]
pub mod tui;
