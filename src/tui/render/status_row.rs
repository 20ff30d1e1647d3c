use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::{App, Mode, View};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = match app.mode {
        Mode::Navigate => {
            if let Some(notice) = &app.notice {
                let color = if notice.is_error { app.theme.red } else { app.theme.green };
                vec![Span::styled(notice.text.clone(), Style::default().fg(color).bg(bg))]
            } else if let Some(pattern) = &app.last_search {
                // Active search, shown dimmed
                vec![Span::styled(
                    format!("/{}", pattern),
                    Style::default().fg(app.theme.dim).bg(bg),
                )]
            } else {
                Vec::new()
            }
        }
        Mode::Search => vec![
            Span::styled(
                format!("/{}", app.search_input),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
        ],
        Mode::ConfirmDelete => {
            let name = app.pending_delete.as_ref().map_or("", |t| t.name.as_str());
            vec![Span::styled(
                format!("Delete \"{}\"? (y/n)", name),
                Style::default().fg(app.theme.yellow).bg(bg),
            )]
        }
        Mode::Form => match &app.notice {
            Some(notice) if notice.is_error => vec![Span::styled(
                notice.text.clone(),
                Style::default().fg(app.theme.red).bg(bg),
            )],
            _ => Vec::new(),
        },
    };

    if app.show_key_hints {
        let hint = key_hint(app);
        let content_width = spans_width(&spans);
        let hint_width = hint.chars().count();
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn key_hint(app: &App) -> &'static str {
    match app.mode {
        Mode::Search => "Enter keep  Esc cancel",
        Mode::ConfirmDelete => "",
        Mode::Form => "Tab next  ^S save  Esc cancel",
        Mode::Navigate => match app.view() {
            View::Dashboard => "Enter open  Tab boards  ? help",
            View::Board(_) => "n new  e edit  d delete  / search  ? help",
        },
    }
}
