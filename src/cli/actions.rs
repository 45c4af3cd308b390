use anyhow::Result;
use clap::ArgMatches;
use std::io::Write;

use crate::protocol::SerialBackend;

/// Run one-shot commands. Returns true if one ran and the process should exit.
pub fn run_one_shot_actions(matches: &ArgMatches, backend: &dyn SerialBackend) -> Result<bool> {
    if matches.get_flag("list-ports") {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        list_ports(backend, matches.get_flag("json"), &mut out)?;
        return Ok(true);
    }
    Ok(false)
}

/// Print the enumerated ports, one name per line or as a JSON array.
/// An enumeration failure prints an empty list.
pub fn list_ports(backend: &dyn SerialBackend, json: bool, out: &mut impl Write) -> Result<()> {
    let ports = backend.available_ports().unwrap_or_else(|err| {
        log::warn!("port enumeration failed: {err:#}");
        Vec::new()
    });

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&ports)?)?;
    } else {
        for p in &ports {
            writeln!(out, "{}", p.port_name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::loopback::LoopbackBackend;

    #[test]
    fn plain_listing_keeps_enumeration_order() {
        let backend = LoopbackBackend::new();
        backend.add_device("/dev/ttyUSB1");
        backend.add_device("/dev/ttyACM0");
        let mut out = Vec::new();
        list_ports(&backend, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/dev/ttyUSB1\n/dev/ttyACM0\n");
    }

    #[test]
    fn json_listing() {
        let backend = LoopbackBackend::new();
        backend.add_device("COM5");
        let mut out = Vec::new();
        list_ports(&backend, true, &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["port_name"], "COM5");
        assert_eq!(parsed[0]["port_type"], "Loopback");
    }

    #[test]
    fn empty_listing() {
        let backend = LoopbackBackend::new();
        let mut out = Vec::new();
        list_ports(&backend, true, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }
}
