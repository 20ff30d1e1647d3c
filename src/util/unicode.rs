use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` down to `max_cells` terminal cells, ending in `…` when shortened
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Truncate or right-pad `s` to exactly `cells` terminal cells
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

/// Byte offset of the grapheme after the one at `offset`; `None` at the end
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    let len = s[offset..].graphemes(true).next().map_or(0, str::len);
    Some(offset + len)
}

/// Byte offset of the grapheme before `offset`; `None` at the start
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `offset` (whitespace-delimited)
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..offset].grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word right of `offset` (or the end of `s`)
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let mut graphemes = s[offset..].grapheme_indices(true).peekable();
    while graphemes.next_if(|(_, g)| !is_space(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_space(g)).is_some() {}
    graphemes.peek().map_or(s.len(), |(i, _)| offset + i)
}
