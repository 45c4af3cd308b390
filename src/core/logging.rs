use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::core::csv_sink::CsvSink;

/// What the logging button does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingAction {
    Start,
    Stop,
}

/// At most one open session file. Independent of the connection.
#[derive(Debug, Default)]
pub enum LoggingState {
    #[default]
    Idle,
    Logging(CsvSink),
}

impl LoggingState {
    pub fn is_logging(&self) -> bool {
        matches!(self, LoggingState::Logging(_))
    }

    pub fn action(&self) -> LoggingAction {
        match self {
            LoggingState::Idle => LoggingAction::Start,
            LoggingState::Logging(_) => LoggingAction::Stop,
        }
    }

    pub fn sink(&self) -> Option<&CsvSink> {
        match self {
            LoggingState::Logging(sink) => Some(sink),
            LoggingState::Idle => None,
        }
    }

    /// `Idle -> Logging`. If the file cannot be created the state stays `Idle`.
    pub fn start(&mut self, dir: &Path, started: DateTime<Local>) -> Result<PathBuf> {
        if let LoggingState::Logging(sink) = self {
            bail!("already logging to {}", sink.path().display());
        }
        let sink = CsvSink::create(dir, started)?;
        let path = sink.path().to_path_buf();
        *self = LoggingState::Logging(sink);
        Ok(path)
    }

    /// `Logging -> Idle`. The sink is closed even if the final flush fails.
    pub fn stop(&mut self) -> Result<PathBuf> {
        match std::mem::take(self) {
            LoggingState::Logging(sink) => sink.finish(),
            LoggingState::Idle => bail!("not logging"),
        }
    }

    /// Append a row when logging. Returns whether a row was written.
    pub fn record(&mut self, when: DateTime<Local>, line: &str) -> Result<bool> {
        match self {
            LoggingState::Logging(sink) => {
                sink.write_line(when, line)?;
                Ok(true)
            }
            LoggingState::Idle => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("uart_monitor_log_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn idle_does_not_record() {
        let mut state = LoggingState::default();
        assert_eq!(state.action(), LoggingAction::Start);
        assert!(!state.record(Local::now(), "dropped").unwrap());
    }

    #[test]
    fn start_twice_is_rejected() {
        let dir = temp_dir();
        let mut state = LoggingState::default();
        let first = state.start(&dir, Local::now()).unwrap();
        assert_eq!(state.action(), LoggingAction::Stop);
        assert!(state.start(&dir, Local::now()).is_err());
        assert_eq!(state.sink().unwrap().path(), first.as_path());
        state.stop().unwrap();
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn stop_when_idle_is_rejected() {
        let mut state = LoggingState::default();
        assert!(state.stop().is_err());
        assert!(!state.is_logging());
    }

    #[test]
    fn failed_start_stays_idle() {
        let dir = temp_dir().join("missing");
        let mut state = LoggingState::default();
        assert!(state.start(&dir, Local::now()).is_err());
        assert!(!state.is_logging());
    }
}
