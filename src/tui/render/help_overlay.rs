use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::helpers::centered_rect;
use crate::tui::app::{App, View};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(52, 24, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Boards", header_style)));
    add_binding(&mut lines, " Tab/S-Tab", "Next / previous tab", key_style, desc_style);
    add_binding(&mut lines, " 0-9", "Jump to tab", key_style, desc_style);
    add_binding(&mut lines, " R", "Reload boards", key_style, desc_style);
    lines.push(Line::from(""));

    match app.view() {
        View::Dashboard => {
            lines.push(Line::from(Span::styled(" Dashboard", header_style)));
            add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Open board", key_style, desc_style);
        }
        View::Board(_) => {
            lines.push(Line::from(Span::styled(" Board", header_style)));
            add_binding(&mut lines, " hjkl/arrows", "Move between tasks", key_style, desc_style);
            add_binding(&mut lines, " n", "New task in column", key_style, desc_style);
            add_binding(&mut lines, " e/Enter", "Edit task", key_style, desc_style);
            add_binding(&mut lines, " d", "Delete task", key_style, desc_style);
            add_binding(&mut lines, " r", "Reload tasks", key_style, desc_style);
            add_binding(&mut lines, " /", "Filter by pattern", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Clear filter", key_style, desc_style);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(" Task form", header_style)));
            add_binding(&mut lines, " Tab/S-Tab", "Next / previous field", key_style, desc_style);
            add_binding(&mut lines, " Enter/Space", "Open menu, pick item", key_style, desc_style);
            add_binding(&mut lines, " n (on Tags)", "New tag", key_style, desc_style);
            add_binding(&mut lines, " Ctrl-S", "Save", key_style, desc_style);
        }
    }
    lines.push(Line::from(""));
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(" Help ", header_style))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
