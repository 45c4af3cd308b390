use chrono::Local;
use log::LevelFilter;
use std::io::{self, Write};

use env_logger::{Builder, Target};

/// Environment variable naming a file that receives diagnostic logs.
pub const LOG_FILE_ENV: &str = "UART_MONITOR_LOG_FILE";

/// Common initialization used by every entrypoint: diagnostic logging, then
/// the UI language.
///
/// The TUI owns the terminal, so logs go to a file when one is configured
/// (debug builds always get one).
pub fn init_common() {
    let log_file = std::env::var(LOG_FILE_ENV).ok().or_else(|| {
        #[cfg(debug_assertions)]
        {
            Some(format!(
                "./uart_monitor_{}.log",
                Local::now().format("%Y%m%d%H%M%S")
            ))
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    });

    if let Some(path) = log_file {
        if let Err(err) = init_file_logger(&path) {
            eprintln!("Failed to initialize file logger at '{path}': {err}");
            env_logger::init();
        }
    } else {
        env_logger::init();
    }

    crate::i18n::init_i18n();
}

fn init_file_logger(path: &str) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .init();

    log::info!("File logger initialized at {path}");

    Ok(())
}
