use anyhow::{Context, Result};
use serde::Serialize;
use std::{io::Read, time::Duration};

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};

use crate::protocol::baud::BaudRate;

/// How long a single read may block inside the reader thread. Short enough
/// that a stop request is observed promptly.
pub const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// A device as reported by the OS enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
}

impl PortInfo {
    pub fn new(port_name: impl Into<String>, port_type: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            port_type: port_type.into(),
        }
    }
}

/// Byte source handed to the reader thread.
pub type PortReader = Box<dyn Read + Send + 'static>;

/// Enumeration and open operations of a serial transport.
pub trait SerialBackend: Send {
    /// Devices currently present, in the order the platform reports them.
    fn available_ports(&self) -> Result<Vec<PortInfo>>;

    /// Open `port_name` at `baud` with 8 data bits, no parity, one stop bit
    /// and no flow control.
    fn open(&self, port_name: &str, baud: BaudRate) -> Result<PortReader>;
}

/// The host's serial ports, via the `serialport` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSerial;

impl SerialBackend for SystemSerial {
    fn available_ports(&self) -> Result<Vec<PortInfo>> {
        let ports = serialport::available_ports().context("failed to enumerate serial ports")?;
        Ok(ports
            .into_iter()
            .map(|p| PortInfo::new(p.port_name, describe_port_type(&p.port_type)))
            .collect())
    }

    fn open(&self, port_name: &str, baud: BaudRate) -> Result<PortReader> {
        let handle = serialport::new(port_name, baud.as_u32())
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("failed to open {port_name} at {baud} baud"))?;
        Ok(Box::new(SystemPortReader(handle)))
    }
}

struct SystemPortReader(Box<dyn SerialPort>);

impl Read for SystemPortReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => {
            let mut label = format!("USB {:04x}:{:04x}", info.vid, info.pid);
            if let Some(product) = &info.product {
                label.push(' ');
                label.push_str(product);
            }
            label
        }
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_usb_ports_with_ids() {
        let usb = SerialPortType::UsbPort(serialport::UsbPortInfo {
            vid: 0x0403,
            pid: 0x6001,
            serial_number: None,
            manufacturer: None,
            product: Some("FT232R".to_string()),
        });
        assert_eq!(describe_port_type(&usb), "USB 0403:6001 FT232R");
        assert_eq!(describe_port_type(&SerialPortType::Unknown), "Unknown");
    }
}
