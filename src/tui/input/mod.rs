mod confirm;
pub mod form;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use super::app::{App, Mode};

use confirm::handle_confirm;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay intercepts all input
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => form::handle_form_key(app, key),
        Mode::ConfirmDelete => handle_confirm(app, key),
    }
}

/// Handle a mouse event: the open form gets it first, then the tab bar
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode == Mode::Form {
        form::handle_form_mouse(app, mouse);
        return;
    }
    if app.mode != Mode::Navigate || app.show_help {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        let pos = Position::new(mouse.column, mouse.row);
        let hit = app
            .tab_areas
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, id)| *id);
        if let Some(board_id) = hit {
            app.select_board(board_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::layout::Rect;

    use super::*;
    use crate::router::Navigator;
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::{demo_app, run_until_idle};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, key(code));
        app.tick();
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn tab_keys_switch_boards() {
        let mut app = demo_app("/");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view(), View::Board(2));
        assert_eq!(app.router.pathname(), "/2");
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view(), View::Dashboard);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view(), View::Board(7));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.view(), View::Dashboard);
    }

    #[test]
    fn dashboard_enter_opens_board() {
        let mut app = demo_app("/");
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view(), View::Board(7));
    }

    #[test]
    fn board_cursor_moves_between_columns() {
        let mut app = demo_app("/2");
        assert_eq!(app.column_cursor, 0);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.column_cursor, 1);
        assert_eq!(app.selected_task().unwrap().name, "Fix login redirect loop");
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.row_cursor, 1);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.row_cursor, 1);
    }

    #[test]
    fn new_task_through_the_form() {
        let mut app = demo_app("/2");
        let before = app.tasks.tasks().len();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Form);
        type_str(&mut app, "Ship it");
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        run_until_idle(&mut app);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.tasks.tasks().len(), before + 1);
        assert!(app.tasks.tasks().iter().any(|t| t.name == "Ship it"));
    }

    #[test]
    fn form_escape_cancels_without_saving() {
        let mut app = demo_app("/2");
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::Form);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.form.is_none());
        assert!(!app.edit_task.loading());
    }

    #[test]
    fn inline_tag_creation_from_form() {
        let mut app = demo_app("/2");
        let tags_before = app.details.tags.len();
        press(&mut app, KeyCode::Char('e'));
        for _ in 0..3 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "infra");
        press(&mut app, KeyCode::Enter);
        run_until_idle(&mut app);

        assert_eq!(app.mode, Mode::Form);
        let form = app.form.as_ref().unwrap();
        assert!(form.available_tags().iter().any(|t| t.name == "infra"));
        assert_eq!(app.details.tags.len(), tags_before + 1);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = demo_app("/2");
        let before = app.tasks.tasks().len();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Navigate);
        run_until_idle(&mut app);
        assert_eq!(app.tasks.tasks().len(), before);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        run_until_idle(&mut app);
        assert_eq!(app.tasks.tasks().len(), before - 1);
    }

    #[test]
    fn search_filters_and_escape_clears() {
        let mut app = demo_app("/2");
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "settings");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_search.as_deref(), Some("settings"));
        let visible: usize = app.columns().iter().map(|c| c.tasks.len()).sum();
        assert_eq!(visible, 1);

        press(&mut app, KeyCode::Esc);
        assert!(!app.filter.is_active());
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = demo_app("/");
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view(), View::Dashboard);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn clicking_a_tab_selects_it() {
        let mut app = demo_app("/");
        app.tab_areas = vec![(Rect::new(0, 0, 10, 1), None), (Rect::new(11, 0, 9, 1), Some(7))];
        handle_mouse(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 12,
                row: 0,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(app.view(), View::Board(7));
    }

    #[test]
    fn q_quits() {
        let mut app = demo_app("/");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
