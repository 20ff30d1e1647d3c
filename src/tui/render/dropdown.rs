use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::dropdown::Dropdown;
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Draw an open dropdown at its observed position. Closed or not yet
/// positioned menus draw nothing.
pub fn render_dropdown<K: Clone + PartialEq>(frame: &mut Frame, dropdown: &Dropdown<K>, theme: &Theme) {
    let Some(menu) = dropdown.menu_area() else {
        return;
    };
    let menu = menu.intersection(frame.area());
    if menu.is_empty() {
        return;
    }
    frame.render_widget(Clear, menu);

    let bg = theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(menu);
    frame.render_widget(block, menu);

    let width = inner.width as usize;
    let start = dropdown.scroll_start();
    let lines: Vec<Line> = dropdown
        .items()
        .iter()
        .enumerate()
        .skip(start)
        .take(inner.height as usize)
        .map(|(i, item)| {
            let highlighted = i == dropdown.highlighted();
            let style = if highlighted {
                Style::default()
                    .fg(theme.text_bright)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text).bg(bg)
            };
            let marker = if highlighted { "\u{25B8} " } else { "  " };
            let text = unicode::fit_to_width(&format!("{}{}", marker, item.label), width);
            Line::from(Span::styled(text, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
