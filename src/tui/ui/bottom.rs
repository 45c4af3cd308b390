use ratatui::{prelude::*, widgets::*};

use crate::{
    core::{ConnectionAction, LoggingAction},
    i18n::lang,
    tui::app::App,
};

/// Key hints for the current state, in display order.
pub fn bottom_hints(app: &App) -> Vec<String> {
    let l = lang();
    let mut hints = Vec::new();

    if app.monitor.can_select_port() {
        hints.push(l.hint_select_port.clone());
    }
    hints.push(l.hint_select_baud.clone());
    hints.push(l.hint_refresh.clone());

    let connect = match app.monitor.connection().action() {
        ConnectionAction::Connect => &l.connect,
        ConnectionAction::Disconnect => &l.disconnect,
    };
    hints.push(format!("Enter {connect}"));

    let logging = match app.monitor.logging().action() {
        LoggingAction::Start => &l.start_logging,
        LoggingAction::Stop => &l.stop_logging,
    };
    hints.push(format!("s {logging}"));

    hints.push(l.hint_scroll.clone());
    hints.push(l.press_q_quit.clone());
    hints
}

pub fn render_bottom(f: &mut Frame, area: Rect, app: &App) {
    let help_block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Gray).fg(Color::White));

    let text = bottom_hints(app).join("   ");
    let help = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(help_block);
    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Monitor, MonitorOptions},
        protocol::loopback::LoopbackBackend,
        tui::input::Action,
    };

    #[test]
    fn hints_follow_state() {
        let backend = LoopbackBackend::new();
        backend.add_device("COM3");
        let mut app = App::new(Monitor::new(
            Box::new(backend.clone()),
            MonitorOptions::default(),
        ));

        let idle = bottom_hints(&app);
        assert!(idle.iter().any(|h| h == "Enter Connect"));
        assert!(idle.iter().any(|h| h == "↑↓ port"));

        app.handle(Action::ToggleConnection);
        let connected = bottom_hints(&app);
        assert!(connected.iter().any(|h| h == "Enter Disconnect"));
        assert!(!connected.iter().any(|h| h == "↑↓ port"));
    }
}
