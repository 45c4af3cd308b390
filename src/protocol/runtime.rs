use anyhow::{anyhow, Result};
use flume::{Receiver, Sender};
use std::{
    io::{ErrorKind, Read},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::protocol::{
    backend::{PortReader, SerialBackend},
    baud::BaudRate,
    line::LineAssembler,
};

#[derive(Debug)]
pub enum RuntimeCommand {
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A complete, decoded line.
    Line(String),
    /// The device failed; the reader thread has exited.
    Error(String),
}

/// An open port and the thread reading from it.
///
/// Dropping the handle stops the thread and closes the device.
pub struct PortRuntimeHandle {
    pub port_name: String,
    pub baud: BaudRate,
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PortRuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortRuntimeHandle")
            .field("port_name", &self.port_name)
            .field("baud", &self.baud)
            .finish_non_exhaustive()
    }
}

impl PortRuntimeHandle {
    pub fn spawn(backend: &dyn SerialBackend, port_name: &str, baud: BaudRate) -> Result<Self> {
        let reader = backend.open(port_name, baud)?;
        Self::from_reader(port_name, baud, reader)
    }

    pub fn from_reader(port_name: &str, baud: BaudRate, reader: PortReader) -> Result<Self> {
        let (cmd_tx, cmd_rx) = flume::unbounded();
        let (evt_tx, evt_rx) = flume::unbounded();
        let worker = thread::Builder::new()
            .name(format!("reader:{port_name}"))
            .spawn(move || run_loop(reader, cmd_rx, evt_tx))
            .map_err(|err| anyhow!("failed to spawn reader thread: {err}"))?;

        log::info!("reader thread started for {port_name} at {baud} baud");
        Ok(Self {
            port_name: port_name.to_string(),
            baud,
            cmd_tx,
            evt_rx,
            worker: Some(worker),
        })
    }

    /// Everything the reader has produced so far, in receipt order.
    pub fn drain_events(&self) -> Vec<RuntimeEvent> {
        self.evt_rx.try_iter().collect()
    }

    /// Stop the reader thread and wait for it to release the device.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            // The worker may already have exited after a read error.
            let _ = self.cmd_tx.send(RuntimeCommand::Stop);
            if worker.join().is_err() {
                log::error!("reader thread for {} panicked", self.port_name);
            }
            log::info!("reader thread stopped for {}", self.port_name);
        }
    }
}

impl Drop for PortRuntimeHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(mut reader: PortReader, cmd_rx: Receiver<RuntimeCommand>, evt_tx: Sender<RuntimeEvent>) {
    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; 256];
    loop {
        if let Ok(RuntimeCommand::Stop) = cmd_rx.try_recv() {
            if assembler.pending_len() > 0 {
                log::debug!(
                    "discarding {} bytes of unterminated input",
                    assembler.pending_len()
                );
            }
            return;
        }

        match reader.read(&mut buf) {
            Ok(0) => thread::sleep(Duration::from_millis(2)),
            Ok(n) => {
                for line in assembler.push(&buf[..n]) {
                    log::debug!("rx line: {line:?}");
                    if evt_tx.send(RuntimeEvent::Line(line)).is_err() {
                        return;
                    }
                }
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(err) => {
                log::warn!("read error: {err}");
                let _ = evt_tx.send(RuntimeEvent::Error(format!("read error: {err}")));
                return;
            }
        }
    }
}
