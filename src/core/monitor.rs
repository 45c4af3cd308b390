use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::{
    core::{
        connection::ConnectionState,
        display::DisplayBuffer,
        logging::LoggingState,
    },
    protocol::{BaudRate, PortInfo, RuntimeEvent, SerialBackend},
};

/// Startup settings for a [`Monitor`].
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Directory that receives `uart_log_*.csv` session files.
    pub log_dir: PathBuf,
    /// Cap on visible lines; `None` keeps every line.
    pub max_lines: Option<usize>,
    /// Device to preselect if it is present.
    pub initial_port: Option<String>,
    pub baud: BaudRate,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            max_lines: None,
            initial_port: None,
            baud: BaudRate::default(),
        }
    }
}

/// Application state: device list, the connection, the logging session and
/// the display buffer. Every user action and every tick goes through here;
/// the UI only reads it.
pub struct Monitor {
    backend: Box<dyn SerialBackend>,
    ports: Vec<PortInfo>,
    selected: usize,
    baud: BaudRate,
    connection: ConnectionState,
    logging: LoggingState,
    display: DisplayBuffer,
    log_dir: PathBuf,
    last_refresh: Option<DateTime<Local>>,
}

impl Monitor {
    pub fn new(backend: Box<dyn SerialBackend>, options: MonitorOptions) -> Self {
        let mut monitor = Self {
            backend,
            ports: Vec::new(),
            selected: 0,
            baud: options.baud,
            connection: ConnectionState::default(),
            logging: LoggingState::default(),
            display: DisplayBuffer::new(options.max_lines),
            log_dir: options.log_dir,
            last_refresh: None,
        };
        monitor.refresh_ports();
        if let Some(name) = options.initial_port.as_deref() {
            if !monitor.select_port(name) {
                log::warn!("requested port {name} is not present");
            }
        }
        monitor
    }

    // Port directory

    /// Re-enumerate devices. Keeps the current selection when it is still
    /// present and never touches an open connection.
    pub fn refresh_ports(&mut self) {
        let previous = self.selected_port().map(str::to_owned);
        self.ports = match self.backend.available_ports() {
            Ok(ports) => ports,
            Err(err) => {
                log::warn!("port enumeration failed: {err:#}");
                Vec::new()
            }
        };
        self.selected = previous
            .and_then(|name| self.ports.iter().position(|p| p.port_name == name))
            .unwrap_or(0);
        self.last_refresh = Some(Local::now());
        log::debug!("found {} serial ports", self.ports.len());
    }

    pub fn ports(&self) -> &[PortInfo] {
        &self.ports
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_port(&self) -> Option<&str> {
        self.ports.get(self.selected).map(|p| p.port_name.as_str())
    }

    /// Device selection is locked while a port is open.
    pub fn can_select_port(&self) -> bool {
        !self.connection.is_connected()
    }

    pub fn select_next_port(&mut self) {
        if self.can_select_port() && !self.ports.is_empty() {
            self.selected = (self.selected + 1) % self.ports.len();
        }
    }

    pub fn select_prev_port(&mut self) {
        if self.can_select_port() && !self.ports.is_empty() {
            self.selected = (self.selected + self.ports.len() - 1) % self.ports.len();
        }
    }

    /// Select by name. Returns false if locked or not present.
    pub fn select_port(&mut self, name: &str) -> bool {
        if !self.can_select_port() {
            return false;
        }
        match self.ports.iter().position(|p| p.port_name == name) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    // Baud selector; takes effect on the next connect.

    pub fn baud(&self) -> BaudRate {
        self.baud
    }

    pub fn set_baud(&mut self, baud: BaudRate) {
        self.baud = baud;
    }

    pub fn next_baud(&mut self) {
        self.baud = self.baud.next();
    }

    pub fn prev_baud(&mut self) {
        self.baud = self.baud.prev();
    }

    // Connection

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn toggle_connection(&mut self) {
        if self.connection.is_connected() {
            self.disconnect();
        } else {
            self.connect();
        }
    }

    /// Open the selected device. Failures are shown inline.
    pub fn connect(&mut self) {
        let port = self.selected_port().map(str::to_owned);
        match self
            .connection
            .connect(self.backend.as_ref(), port.as_deref(), self.baud)
        {
            Ok(()) => log::info!(
                "connected to {} at {} baud",
                port.as_deref().unwrap_or_default(),
                self.baud
            ),
            Err(err) => {
                log::warn!("connect failed: {err:#}");
                self.display.push_error(format!("{err:#}"));
            }
        }
    }

    pub fn disconnect(&mut self) {
        match self.connection.disconnect() {
            Ok(port) => log::info!("disconnected from {port}"),
            Err(err) => log::debug!("disconnect ignored: {err}"),
        }
    }

    // Logging

    pub fn logging(&self) -> &LoggingState {
        &self.logging
    }

    pub fn is_logging(&self) -> bool {
        self.logging.is_logging()
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn toggle_logging(&mut self) {
        if self.logging.is_logging() {
            self.stop_logging();
        } else {
            self.start_logging();
        }
    }

    /// Open a new session file. Failures are shown inline and leave logging off.
    pub fn start_logging(&mut self) {
        if let Err(err) = self.logging.start(&self.log_dir, Local::now()) {
            log::warn!("start logging failed: {err:#}");
            self.display.push_error(format!("{err:#}"));
        }
    }

    pub fn stop_logging(&mut self) {
        if !self.logging.is_logging() {
            return;
        }
        match self.logging.stop() {
            Ok(path) => log::debug!("closed {}", path.display()),
            Err(err) => {
                log::warn!("stop logging: {err:#}");
                self.display.push_error(format!("{err:#}"));
            }
        }
    }

    // Poll-and-display

    /// Move everything the reader produced since the last tick into the
    /// display (and the session file when logging). A read error is shown
    /// inline and closes the port. Returns the number of lines taken.
    pub fn tick(&mut self) -> usize {
        let events = match self.connection.handle() {
            Some(handle) => handle.drain_events(),
            None => return 0,
        };

        let mut taken = 0;
        for event in events {
            match event {
                RuntimeEvent::Line(text) => {
                    self.on_line(text);
                    taken += 1;
                }
                RuntimeEvent::Error(message) => {
                    self.display.push_error(&message);
                    self.disconnect();
                    break;
                }
            }
        }
        taken
    }

    fn on_line(&mut self, text: String) {
        let when = Local::now();
        if let Err(err) = self.logging.record(when, &text) {
            log::error!("log write failed, logging stopped: {err:#}");
            // Dropping the sink retries the flush once; that result is ignored.
            self.logging = LoggingState::Idle;
            self.display.push_data(text);
            self.display.push_error(format!("{err:#}"));
            return;
        }
        self.display.push_data(text);
    }

    pub fn display(&self) -> &DisplayBuffer {
        &self.display
    }

    /// Close the session file and the port before exit.
    pub fn shutdown(&mut self) {
        if self.logging.is_logging() {
            self.stop_logging();
        }
        if self.connection.is_connected() {
            self.disconnect();
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
