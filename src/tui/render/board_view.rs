use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::helpers::{due_label, spans_width};
use super::push_highlighted_spans;
use crate::model::Task;
use crate::tui::app::{App, Column};
use crate::util::unicode;

/// Rows each task card takes: name line + details line
const CARD_ROWS: usize = 2;

/// Render the board page: one column per state, in state order
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    if !app.tasks.error.is_empty() || !app.details.error().is_empty() {
        let message = if app.tasks.error.is_empty() {
            app.details.error()
        } else {
            &app.tasks.error
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  \u{26A0} {}", message),
                Style::default().fg(app.theme.red).bg(bg),
            )),
            Line::from(Span::styled("  r to retry", dim)),
        ];
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    let columns = app.columns();
    if columns.is_empty() {
        let text = if app.details.loading() || app.tasks.loading {
            "  Loading\u{2026}"
        } else {
            "  This board has no states"
        };
        let lines = vec![Line::from(""), Line::from(Span::styled(text, dim))];
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (column, col_area)) in columns.iter().zip(areas.iter()).enumerate() {
        let cursor = (i == app.column_cursor).then_some(app.row_cursor);
        let accent = app.theme.state_color(i, columns.len());
        render_column(frame, app, column, accent, cursor, *col_area);
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    column: &Column,
    accent: Color,
    cursor: Option<usize>,
    area: Rect,
) {
    let bg = app.theme.background;
    let focused = cursor.is_some();
    let border_color = if focused {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", column.state.name),
            Style::default()
                .fg(accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", column.tasks.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let visible_cards = (inner.height as usize / CARD_ROWS).max(1);
    let start = match cursor {
        Some(row) if row >= visible_cards => row + 1 - visible_cards,
        _ => 0,
    };

    let today = Local::now().date_naive();
    let mut lines: Vec<Line> = Vec::new();
    for (row, task) in column.tasks.iter().enumerate().skip(start).take(visible_cards) {
        let selected = cursor == Some(row);
        card_lines(app, task, selected, width, today, &mut lines);
    }
    if column.tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            " \u{2014}",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn card_lines(
    app: &App,
    task: &Task,
    selected: bool,
    width: usize,
    today: chrono::NaiveDate,
    lines: &mut Vec<Line<'static>>,
) {
    let row_bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let name_style = if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(row_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(row_bg)
    };
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);

    let mut name_spans: Vec<Span<'static>> = vec![Span::styled(" ", Style::default().bg(row_bg))];
    let name = unicode::truncate_to_width(&task.name, width.saturating_sub(1));
    push_highlighted_spans(
        &mut name_spans,
        &name,
        name_style,
        match_style,
        app.filter.pattern.as_ref(),
    );
    pad_line(&mut name_spans, width, row_bg);
    lines.push(Line::from(name_spans));

    let mut meta: Vec<Span<'static>> = vec![Span::styled(" ", Style::default().bg(row_bg))];
    if let Some(due) = task.due_date() {
        meta.push(Span::styled(
            format!("{} ", due_label(due, today)),
            Style::default().fg(app.theme.due_color(due, today)).bg(row_bg),
        ));
    }
    for tag in &task.tags {
        let label = format!("#{} ", tag.name);
        if spans_width(&meta) + unicode::display_width(&label) > width {
            break;
        }
        meta.push(Span::styled(
            label,
            Style::default().fg(app.theme.tag_color(&tag.name)).bg(row_bg),
        ));
    }
    pad_line(&mut meta, width, row_bg);
    lines.push(Line::from(meta));
}

fn pad_line(spans: &mut Vec<Span<'static>>, width: usize, bg: ratatui::style::Color) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_H, demo_app, render_to_string};

    #[test]
    fn columns_in_state_order_with_tasks() {
        let app = demo_app("/2");
        let output = render_to_string(120, TERM_H, |frame, area| {
            render_board_view(frame, &app, area);
        });
        let header = output.lines().next().unwrap();
        let backlog = header.find("Backlog").unwrap();
        let progress = header.find("In Progress").unwrap();
        let done = header.find("Done").unwrap();
        assert!(backlog < progress && progress < done);
        assert!(output.contains("Write onboarding copy"));
        assert!(output.contains("#bug"));
    }

    #[test]
    fn filter_hides_other_tasks() {
        let mut app = demo_app("/2");
        app.set_filter("settings");
        let output = render_to_string(120, TERM_H, |frame, area| {
            render_board_view(frame, &app, area);
        });
        assert!(output.contains("New settings page"));
        assert!(!output.contains("Write onboarding copy"));
    }

    #[test]
    fn load_error_replaces_columns() {
        let mut app = demo_app("/2");
        app.tasks.error = "board 2 not found".into();
        let output = render_to_string(80, 10, |frame, area| {
            render_board_view(frame, &app, area);
        });
        assert!(output.contains("board 2 not found"));
        assert!(output.contains("r to retry"));
    }
}
