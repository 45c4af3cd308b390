use ratatui::{prelude::*, widgets::*};

use crate::{i18n::lang, tui::app::App};

pub fn render_title(f: &mut Frame, area: Rect, app: &App) {
    // Horizontal layout: left (activity) + center (title) + right (reserved)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(area);

    // Background bar
    let bg_block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Gray));
    f.render_widget(bg_block, area);

    // Activity markers: port open, session file open
    let mut marks = Vec::new();
    if app.monitor.is_connected() {
        marks.push(Span::styled(
            " ●",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if app.monitor.is_logging() {
        marks.push(Span::styled(
            " ●",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(marks)), chunks[0]);

    let title_text = match app.monitor.connection().handle() {
        Some(handle) => format!(
            "{} - {} @ {}",
            handle.port_name,
            lang().title.as_str(),
            handle.baud
        ),
        None => lang().title.clone(),
    };

    let title_para = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Rgb(0, 100, 0))
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(title_para, chunks[1]);
}
