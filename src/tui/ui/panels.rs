use ratatui::{prelude::*, widgets::*};

use crate::{
    core::{ConnectionAction, LoggingAction},
    i18n::lang,
    tui::app::App,
};

pub fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let chunks = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .margin(0)
        .constraints([
            ratatui::layout::Constraint::Min(3),
            ratatui::layout::Constraint::Length(8),
        ])
        .split(area);

    render_port_list(f, chunks[0], app);
    render_settings(f, chunks[1], app);
}

fn render_port_list(f: &mut Frame, area: Rect, app: &App) {
    let monitor = &app.monitor;
    let locked = !monitor.can_select_port();

    let mut title = format!(" {} ", lang().controls);
    if locked {
        title.push_str(&lang().port_locked);
        title.push(' ');
    }
    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);
    if !locked {
        block = block.style(Style::default().fg(Color::LightGreen));
    }

    if monitor.ports().is_empty() {
        let empty = Paragraph::new(lang().no_com_ports.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = monitor
        .ports()
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::raw(p.port_name.clone()),
                Span::styled(
                    format!("  {}", p.port_type),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let highlight = if locked {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default()
            .bg(Color::Rgb(0, 100, 0))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let list = List::new(items).block(block).highlight_style(highlight);

    let mut state = ListState::default();
    state.select(Some(monitor.selected_index()));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_settings(f: &mut Frame, area: Rect, app: &App) {
    let monitor = &app.monitor;
    let l = lang();
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::raw(format!("{} ", l.label_baud)),
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            monitor.baud().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
    ]));

    let (state_text, state_style) = if monitor.is_connected() {
        (l.state_connected.as_str(), Style::default().fg(Color::Green))
    } else {
        (l.state_disconnected.as_str(), Style::default().fg(Color::DarkGray))
    };
    let connect_label = match monitor.connection().action() {
        ConnectionAction::Connect => l.connect.as_str(),
        ConnectionAction::Disconnect => l.disconnect.as_str(),
    };
    lines.push(Line::from(vec![
        Span::raw(format!("{} ", l.label_connection)),
        Span::styled(state_text, state_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  [Enter] ", key_style),
        Span::raw(connect_label),
    ]));

    let logging_label = match monitor.logging().action() {
        LoggingAction::Start => l.start_logging.as_str(),
        LoggingAction::Stop => l.stop_logging.as_str(),
    };
    match monitor.logging().sink() {
        Some(sink) => {
            let file = sink
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", l.label_logging)),
                Span::styled(
                    format!("{} {file} ({} {})", l.state_logging, sink.rows(), l.rows),
                    Style::default().fg(Color::Red),
                ),
            ]));
        }
        None => lines.push(Line::from(vec![
            Span::raw(format!("{} ", l.label_logging)),
            Span::styled(l.state_idle.as_str(), Style::default().fg(Color::DarkGray)),
        ])),
    }
    lines.push(Line::from(vec![
        Span::styled("  [s] ", key_style),
        Span::raw(logging_label),
    ]));

    let last = monitor
        .last_refresh()
        .map(|t| format!("{} {}", l.last, t.format("%H:%M:%S")))
        .unwrap_or_else(|| l.last_none.clone());
    lines.push(Line::from(Span::styled(
        last,
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
