use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Short due date label relative to `today`
pub(super) fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    match (due - today).num_days() {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        -1 => "due yesterday".to_string(),
        _ => format!("due {}", due.format("%b %-d")),
    }
}

/// A rectangle of at most `width` x `height` centered in `area`
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
