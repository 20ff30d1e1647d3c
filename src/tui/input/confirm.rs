use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

/// y deletes the pending task, anything else backs out
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let pending = app.pending_delete.take();
    app.mode = Mode::Navigate;
    if let (KeyCode::Char('y') | KeyCode::Char('Y'), Some(task)) = (key.code, pending)
        && !app.delete_task.delete_task(&app.api, task.id)
    {
        app.notify_error("a delete is already in progress".to_string());
    }
}
