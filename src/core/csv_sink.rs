use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::{
    fs::{File, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Session file names: `uart_log_<YYYYMMDD>_<HHMMSS>.csv`.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Row timestamps, microsecond precision.
pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
pub const HEADER: [&str; 2] = ["Timestamp", "Data"];

const MAX_NAME_ATTEMPTS: usize = 1000;

pub fn session_file_name(started: &DateTime<Local>, attempt: usize) -> String {
    let stamp = started.format(FILE_TIMESTAMP_FORMAT);
    if attempt == 0 {
        format!("uart_log_{stamp}.csv")
    } else {
        format!("uart_log_{stamp}_{attempt}.csv")
    }
}

/// One logging session's CSV file.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<Box<dyn Write + Send>>,
    rows: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("path", &self.path)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Create a fresh session file in `dir` and write the header.
    ///
    /// An existing file is never reused: a second session started within the
    /// same second gets a `_1`, `_2`, ... suffix.
    pub fn create(dir: &Path, started: DateTime<Local>) -> Result<Self> {
        let (path, file) = create_unique(dir, &started)?;
        Self::from_writer(path, Box::new(file))
    }

    /// Start a session on an already opened writer; `path` is only reported.
    pub fn from_writer(path: PathBuf, out: Box<dyn Write + Send>) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(out);
        writer
            .write_record(HEADER)
            .with_context(|| format!("failed to write header to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;

        log::info!("logging session started: {}", path.display());
        Ok(Self {
            path,
            writer,
            rows: 0,
        })
    }

    /// Append one `(timestamp, line)` row and flush it to the OS.
    pub fn write_line(&mut self, when: DateTime<Local>, line: &str) -> Result<()> {
        let stamp = when.format(ROW_TIMESTAMP_FORMAT).to_string();
        self.writer
            .write_record([stamp.as_str(), line])
            .with_context(|| format!("failed to write to {}", self.path.display()))?;
        self.writer
            .flush()
            .with_context(|| format!("failed to flush {}", self.path.display()))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and close the file, returning its path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .with_context(|| format!("failed to flush {}", self.path.display()))?;
        log::info!(
            "logging session closed: {} ({} rows)",
            self.path.display(),
            self.rows
        );
        Ok(self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

fn create_unique(dir: &Path, started: &DateTime<Local>) -> Result<(PathBuf, File)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(session_file_name(started, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("failed to create {}", path.display()))
            }
        }
    }
    anyhow::bail!(
        "failed to create a log file in {}: too many sessions started at {}",
        dir.display(),
        started.format(FILE_TIMESTAMP_FORMAT)
    )
}
