use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

/// Typing a search pattern: the board filters live as the pattern changes
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel search, back to the previous pattern
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
            let previous = app.last_search.clone().unwrap_or_default();
            app.set_filter(&previous);
        }

        // Keep the pattern
        (_, KeyCode::Enter) => {
            app.mode = Mode::Navigate;
            let query = std::mem::take(&mut app.search_input);
            app.last_search = if query.is_empty() { None } else { Some(query) };
        }

        (_, KeyCode::Backspace) => {
            app.search_input.pop();
            refresh(app);
        }

        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            app.search_input.clear();
            refresh(app);
        }

        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
            refresh(app);
        }

        _ => {}
    }
}

fn refresh(app: &mut App) {
    let pattern = app.search_input.clone();
    app.set_filter(&pattern);
}
