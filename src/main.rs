use uart_monitor::{boot, cli, protocol::SystemSerial, tui};

fn run() -> anyhow::Result<()> {
    let matches = cli::parse_args();

    if cli::actions::run_one_shot_actions(&matches, &SystemSerial)? {
        return Ok(());
    }

    let options = cli::monitor_options(&matches)?;
    log::info!(
        "Starting monitor: log dir {}, baud {}",
        options.log_dir.display(),
        options.baud
    );
    tui::start(options)
}

fn main() {
    boot::init_common();

    if let Err(err) = run() {
        log::error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
