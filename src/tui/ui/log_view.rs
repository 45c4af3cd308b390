use ratatui::{prelude::*, widgets::*};

use crate::{core::LineKind, i18n::lang, tui::app::App};

/// Index range of the lines visible in a view `height` rows tall, scrolled
/// `scroll` lines back from the newest one.
pub fn visible_window(total: usize, height: usize, scroll: usize) -> (usize, usize) {
    let end = total.saturating_sub(scroll);
    let start = end.saturating_sub(height);
    (start, end)
}

pub fn render_log_view(f: &mut Frame, area: Rect, app: &App) {
    let display = app.monitor.display();

    let mut title = format!(" {} ({}) ", lang().received, display.len());
    if app.is_following() {
        title.push_str(&format!("[{}] ", lang().follow));
    } else {
        title.push_str(&format!("[-{}] ", app.scroll));
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);

    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_window(display.len(), height, app.scroll);

    let lines: Vec<Line> = display.lines()[start..end]
        .iter()
        .map(|line| {
            let text_style = match line.kind {
                LineKind::Data => Style::default(),
                LineKind::Error => Style::default().fg(Color::Red),
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", line.when.format("%H:%M:%S%.3f")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(line.text.as_str(), text_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::visible_window;

    #[test]
    fn window_tracks_bottom() {
        assert_eq!(visible_window(0, 10, 0), (0, 0));
        assert_eq!(visible_window(5, 10, 0), (0, 5));
        assert_eq!(visible_window(30, 10, 0), (20, 30));
        assert_eq!(visible_window(30, 10, 5), (15, 25));
        assert_eq!(visible_window(30, 10, 29), (0, 1));
        assert_eq!(visible_window(30, 10, 40), (0, 0));
    }
}
