pub(self) mod bottom;
pub(self) mod log_view;
pub(self) mod panels;
pub(self) mod title;

use ratatui::prelude::*;

use crate::tui::app::App;

pub fn render_ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let main_chunks = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .margin(0)
        .constraints([
            ratatui::layout::Constraint::Length(1), // Title
            ratatui::layout::Constraint::Min(0),
            ratatui::layout::Constraint::Length(1), // Bottom help
        ])
        .split(area);

    let body = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .margin(0)
        .constraints([
            ratatui::layout::Constraint::Percentage(35),
            ratatui::layout::Constraint::Percentage(65),
        ])
        .split(main_chunks[1]);

    title::render_title(f, main_chunks[0], app);
    panels::render_controls(f, body[0], app);
    log_view::render_log_view(f, body[1], app);
    bottom::render_bottom(f, main_chunks[2], app);
}
