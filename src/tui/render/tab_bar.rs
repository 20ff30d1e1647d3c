use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::spans_width;
use crate::tui::app::App;
use crate::util::unicode;

/// Render the tab bar: board tabs (or loading/error state) with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &mut App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25A6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", bg_style),
    ];
    let mut sep_cols: Vec<usize> = Vec::new();
    app.tab_areas.clear();

    if app.boards.loading() && !app.tabs.has_loaded() {
        spans.push(Span::styled(
            loading_bar(area.width.saturating_sub(4) as usize),
            Style::default().fg(app.theme.cyan).bg(bg),
        ));
    } else if !app.boards.error().is_empty() {
        spans.push(Span::styled(
            format!("\u{26A0} {}", app.boards.error()),
            Style::default().fg(app.theme.red).bg(bg),
        ));
    } else {
        let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
        for tab in app.tabs.tabs(app.boards.boards()) {
            let x = area.x + spans_width(&spans) as u16;
            let label = format!(" {} ", tab.label);
            let width = unicode::display_width(&label) as u16;
            if x + width > area.right() {
                break;
            }
            spans.push(Span::styled(label, tab_style(app, tab.selected)));
            app.tab_areas.push((Rect::new(x, area.y, width, 1), tab.board_id));
            sep_cols.push(spans_width(&spans));
            spans.push(sep.clone());
        }
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

/// Indeterminate progress bar shown while boards load
fn loading_bar(width: usize) -> String {
    let filled = (width / 3).max(1).min(width);
    format!("{}{}", "\u{2501}".repeat(filled), "\u{2500}".repeat(width - filled))
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let style = Style::default().fg(app.theme.dim).bg(app.theme.background);
    let line: String = (0..width)
        .map(|col| if sep_cols.contains(&col) { '\u{2534}' } else { '\u{2500}' })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(Span::styled(line, style))), area);
}

fn tab_style(app: &App, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::MemoryApi;
    use crate::model::ClientConfig;
    use crate::tui::render::test_helpers::{TERM_W, demo_app, render_to_string, run_until_idle};

    #[test]
    fn shows_dashboard_then_boards() {
        let mut app = demo_app("/2");
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &mut app, area);
        });
        let first = output.lines().next().unwrap();
        assert!(first.contains(" Dashboard "));
        assert!(first.contains(" Product "));
        assert!(first.contains(" Home "));
        assert_eq!(app.tab_areas.len(), 3);
        assert_eq!(app.tab_areas[1].1, Some(2));
    }

    #[test]
    fn shows_error_instead_of_tabs() {
        let api = Arc::new(MemoryApi::demo());
        let mut app = App::new(api.clone(), &ClientConfig::default(), "/");
        app.mount();
        // Let the user load, then make the boards call fail
        app.session.wait();
        api.set_failure(Some("boards unavailable"));
        run_until_idle(&mut app);

        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &mut app, area);
        });
        assert!(output.contains("boards unavailable"));
        assert!(!output.contains("Dashboard"));
    }

    #[test]
    fn loading_bar_fills_width() {
        let bar = loading_bar(9);
        assert_eq!(unicode::display_width(&bar), 9);
        assert!(bar.starts_with('\u{2501}'));
    }
}
