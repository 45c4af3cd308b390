pub mod app;
pub mod input;
pub mod ui;

use anyhow::Result;
use ratatui::{backend::CrosstermBackend, prelude::*};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crate::{
    core::{Monitor, MonitorOptions},
    protocol::SystemSerial,
    tui::input::{map_key, Action},
};
use app::App;

/// Period of the reader poll; new lines show up at most this late.
pub const TICK: Duration = Duration::from_millis(100);

pub fn start(options: MonitorOptions) -> Result<()> {
    log::info!("[TUI] uart_monitor starting...");

    let mut app = App::new(Monitor::new(Box::new(SystemSerial), options));

    // Setup terminal
    let mut stdout = io::stdout();
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(&mut stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;

    // Close the log file before the port, whatever ended the loop.
    app.monitor.shutdown();
    log::info!("[TUI] uart_monitor stopped");

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<&mut Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| crate::tui::ui::render_ui(f, app))?;

        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if crossterm::event::poll(timeout)? {
            if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                let action = map_key(key);
                if action != Action::None {
                    log::debug!("[TUI] action {action:?}");
                }
                app.handle(action);
            }
        }

        if last_tick.elapsed() >= TICK {
            app.on_tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
