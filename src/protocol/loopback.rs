//! In-memory serial backend.
//!
//! Devices are registered by name and fed from the test side with
//! [`LoopbackDevice::inject`]; a failure can be scripted with
//! [`LoopbackDevice::fail`]. Used by the unit and integration tests to drive
//! the monitor without hardware.

use anyhow::{bail, Result};
use flume::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::{
    io::{self, ErrorKind, Read},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::protocol::{
    backend::{PortInfo, PortReader, SerialBackend},
    baud::BaudRate,
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
enum Chunk {
    Data(Vec<u8>),
    Fail(ErrorKind),
}

/// One simulated device.
#[derive(Debug, Clone)]
pub struct LoopbackDevice {
    name: String,
    tx: Sender<Chunk>,
    rx: Receiver<Chunk>,
    open: Arc<AtomicBool>,
}

impl LoopbackDevice {
    fn new(name: &str) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            name: name.to_string(),
            tx,
            rx,
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue bytes as if the remote end had transmitted them.
    pub fn inject(&self, bytes: &[u8]) {
        let _ = self.tx.send(Chunk::Data(bytes.to_vec()));
    }

    /// Make the next read after any queued data fail with `kind`.
    pub fn fail(&self, kind: ErrorKind) {
        let _ = self.tx.send(Chunk::Fail(kind));
    }

    /// Whether a reader currently holds the device.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

/// A set of simulated devices. Clones share the same set.
#[derive(Debug, Default, Clone)]
pub struct LoopbackBackend {
    devices: Arc<Mutex<Vec<LoopbackDevice>>>,
}

impl LoopbackBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device, or return the existing one with that name.
    pub fn add_device(&self, name: &str) -> LoopbackDevice {
        let mut devices = self.devices.lock();
        if let Some(existing) = devices.iter().find(|d| d.name == name) {
            return existing.clone();
        }
        let device = LoopbackDevice::new(name);
        devices.push(device.clone());
        device
    }

    /// Unplug a device. An open reader keeps working until it is closed.
    pub fn remove_device(&self, name: &str) {
        self.devices.lock().retain(|d| d.name != name);
    }
}

impl SerialBackend for LoopbackBackend {
    fn available_ports(&self) -> Result<Vec<PortInfo>> {
        Ok(self
            .devices
            .lock()
            .iter()
            .map(|d| PortInfo::new(d.name.clone(), "Loopback"))
            .collect())
    }

    fn open(&self, port_name: &str, baud: BaudRate) -> Result<PortReader> {
        let devices = self.devices.lock();
        let Some(device) = devices.iter().find(|d| d.name == port_name) else {
            bail!("failed to open {port_name} at {baud} baud: no such device");
        };
        if device
            .open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            bail!("failed to open {port_name} at {baud} baud: device busy");
        }
        Ok(Box::new(LoopbackReader {
            rx: device.rx.clone(),
            pending: Vec::new(),
            open: Arc::clone(&device.open),
        }))
    }
}

struct LoopbackReader {
    rx: Receiver<Chunk>,
    pending: Vec<u8>,
    open: Arc<AtomicBool>,
}

impl Read for LoopbackReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(Chunk::Data(bytes)) => self.pending = bytes,
                Ok(Chunk::Fail(kind)) => {
                    return Err(io::Error::new(kind, "loopback device failure"))
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(io::Error::new(ErrorKind::TimedOut, "no data"))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(io::Error::new(ErrorKind::BrokenPipe, "device gone"))
                }
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

impl Drop for LoopbackReader {
    fn drop(&mut self) {
        self.open.store(false, Ordering::Release);
    }
}
