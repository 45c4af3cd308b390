use anyhow::{bail, Result};

use crate::protocol::{BaudRate, PortRuntimeHandle, SerialBackend};

/// What the connect button does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAction {
    Connect,
    Disconnect,
}

/// At most one open port. The handle only exists while `Connected`.
#[derive(Debug, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(PortRuntimeHandle),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn handle(&self) -> Option<&PortRuntimeHandle> {
        match self {
            ConnectionState::Connected(handle) => Some(handle),
            ConnectionState::Disconnected => None,
        }
    }

    pub fn action(&self) -> ConnectionAction {
        match self {
            ConnectionState::Disconnected => ConnectionAction::Connect,
            ConnectionState::Connected(_) => ConnectionAction::Disconnect,
        }
    }

    /// `Disconnected -> Connected`. On failure the state is unchanged.
    pub fn connect(
        &mut self,
        backend: &dyn SerialBackend,
        port_name: Option<&str>,
        baud: BaudRate,
    ) -> Result<()> {
        if let ConnectionState::Connected(handle) = self {
            bail!("already connected to {}", handle.port_name);
        }
        let Some(port_name) = port_name else {
            bail!("no serial port selected");
        };

        let handle = PortRuntimeHandle::spawn(backend, port_name, baud)?;
        *self = ConnectionState::Connected(handle);
        Ok(())
    }

    /// `Connected -> Disconnected`. Returns the name of the closed port once
    /// the device has been released.
    pub fn disconnect(&mut self) -> Result<String> {
        match std::mem::take(self) {
            ConnectionState::Connected(handle) => {
                let port_name = handle.port_name.clone();
                handle.stop();
                Ok(port_name)
            }
            ConnectionState::Disconnected => bail!("not connected"),
        }
    }
}
