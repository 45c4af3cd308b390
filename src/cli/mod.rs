pub mod actions;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

use crate::{core::MonitorOptions, protocol::BaudRate};

pub fn build_command() -> Command {
    Command::new("uart_monitor")
        .about("Watch line-delimited text on a serial port and log it to CSV")
        .arg(
            Arg::new("list-ports")
                .long("list-ports")
                .short('l')
                .help("List all available serial ports and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .short('j')
                .help("Output the port list in JSON format")
                .action(clap::ArgAction::SetTrue)
                .requires("list-ports"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .help("Preselect this serial port if it is present")
                .value_name("PORT"),
        )
        .arg(
            Arg::new("baud")
                .long("baud")
                .short('b')
                .help("Preselect the baud rate (9600, 19200, 38400, 57600, 115200)")
                .value_name("BAUD")
                .default_value("9600")
                .value_parser(parse_baud),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .short('d')
                .help("Directory for uart_log_*.csv session files")
                .value_name("DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("max-lines")
                .long("max-lines")
                .help("Keep at most this many lines on screen (0 keeps everything)")
                .value_name("N")
                .default_value("0")
                .value_parser(clap::value_parser!(usize)),
        )
}

/// Parse command line arguments and return ArgMatches.
pub fn parse_args() -> ArgMatches {
    build_command().get_matches()
}

fn parse_baud(value: &str) -> Result<BaudRate, String> {
    value.parse::<BaudRate>().map_err(|err| err.to_string())
}

pub fn monitor_options(matches: &ArgMatches) -> Result<MonitorOptions> {
    let log_dir = matches
        .get_one::<PathBuf>("log-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    if !log_dir.is_dir() {
        anyhow::bail!("log directory {} does not exist", log_dir.display());
    }

    Ok(MonitorOptions {
        log_dir,
        max_lines: matches
            .get_one::<usize>("max-lines")
            .copied()
            .filter(|&n| n > 0),
        initial_port: matches.get_one::<String>("port").cloned(),
        baud: matches
            .get_one::<BaudRate>("baud")
            .copied()
            .unwrap_or_default(),
    })
}
