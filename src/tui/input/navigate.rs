use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Any key dismisses the last notice
    app.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab => {
            let boards = app.boards.boards().to_vec();
            app.tabs.select_next(&boards, &mut app.router);
            reset_cursors(app);
        }
        KeyCode::BackTab => {
            let boards = app.boards.boards().to_vec();
            app.tabs.select_prev(&boards, &mut app.router);
            reset_cursors(app);
        }
        KeyCode::Char(c @ '0'..='9') => {
            let index = c.to_digit(10).unwrap_or(0) as usize;
            let tab = app
                .tabs
                .tabs(app.boards.boards())
                .get(index)
                .map(|t| t.board_id);
            if let Some(board_id) = tab {
                app.select_board(board_id);
            }
        }
        KeyCode::Char('R') => app.reload_boards(),
        _ => match app.view() {
            View::Dashboard => handle_dashboard(app, key),
            View::Board(_) => handle_board(app, key),
        },
    }
}

fn reset_cursors(app: &mut App) {
    app.column_cursor = 0;
    app.row_cursor = 0;
}

fn handle_dashboard(app: &mut App, key: KeyEvent) {
    let count = app.boards.boards().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.dashboard_cursor + 1 < count {
                app.dashboard_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.dashboard_cursor = app.dashboard_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.dashboard_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.dashboard_cursor = count.saturating_sub(1),
        KeyCode::Enter => {
            let board_id = app.boards.boards().get(app.dashboard_cursor).map(|b| b.id);
            if board_id.is_some() {
                app.select_board(board_id);
            }
        }
        _ => {}
    }
}

fn handle_board(app: &mut App, key: KeyEvent) {
    let columns = app.columns();
    let rows = columns
        .get(app.column_cursor)
        .map_or(0, |c| c.tasks.len());
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => {
            if app.column_cursor > 0 {
                app.column_cursor -= 1;
                app.row_cursor = 0;
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.column_cursor + 1 < columns.len() {
                app.column_cursor += 1;
                app.row_cursor = 0;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.row_cursor + 1 < rows {
                app.row_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.row_cursor = app.row_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.row_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.row_cursor = rows.saturating_sub(1),
        KeyCode::Char('n') => {
            if let Some(state_id) = app.focused_state() {
                app.open_create_form(state_id);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = app.selected_task() {
                app.open_edit_form(&task);
            }
        }
        KeyCode::Char('d') => {
            if let Some(task) = app.selected_task() {
                app.pending_delete = Some(task);
                app.mode = Mode::ConfirmDelete;
            }
        }
        KeyCode::Char('r') => app.tasks.reload(&app.api),
        KeyCode::Char('/') => {
            app.search_input = app.last_search.clone().unwrap_or_default();
            app.mode = Mode::Search;
        }
        KeyCode::Esc => {
            app.last_search = None;
            app.set_filter("");
        }
        _ => {}
    }
}
