use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

/// Render the dashboard: the signed-in user and the list of boards
pub fn render_dashboard_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(""));
    match app.session.user() {
        Some(user) => lines.push(Line::from(vec![
            Span::styled("  Signed in as ", dim),
            Span::styled(
                user.name.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        None if !app.session.error().is_empty() => lines.push(Line::from(Span::styled(
            format!("  {}", app.session.error()),
            Style::default().fg(app.theme.red).bg(bg),
        ))),
        None => lines.push(Line::from(Span::styled("  Signing in\u{2026}", dim))),
    }
    lines.push(Line::from(""));

    let boards = app.boards.boards();
    if boards.is_empty() {
        if app.tabs.has_loaded() {
            lines.push(Line::from(Span::styled("  No boards yet", dim)));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "  Boards",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
        let name_width = (area.width as usize).saturating_sub(10);
        for (i, board) in boards.iter().enumerate() {
            let selected = i == app.dashboard_cursor;
            let (marker, style) = if selected {
                (
                    "\u{25B8} ",
                    Style::default()
                        .fg(app.theme.text_bright)
                        .bg(app.theme.selection_bg),
                )
            } else {
                ("  ", Style::default().fg(app.theme.text).bg(bg))
            };
            lines.push(Line::from(vec![
                Span::styled("  ", Style::default().bg(bg)),
                Span::styled(marker, Style::default().fg(app.theme.highlight).bg(style.bg.unwrap_or(bg))),
                Span::styled(
                    format!("{} ", unicode::truncate_to_width(&board.name, name_width)),
                    style,
                ),
                Span::styled(format!("#{}", board.id), dim),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, demo_app, render_to_string};

    #[test]
    fn lists_boards_with_cursor() {
        let mut app = demo_app("/");
        app.dashboard_cursor = 1;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_dashboard_view(frame, &app, area);
        });
        assert!(output.contains("Signed in as demo"));
        assert!(output.contains("Product #2"));
        assert!(output.contains("\u{25B8} Home #7"));
    }
}
