use crossterm::event::{KeyEvent, MouseEvent};
use log::debug;

use crate::api::SharedApi;
use crate::model::{BoardId, CreateTagForm, TaskForm};
use crate::store::boards::CreateTag;
use crate::store::tasks::{CreateTask, EditTask};
use crate::tui::app::{App, View};
use crate::tui::form::{FormPurpose, TaskEditForm, TaskFormEvents};

/// Routes form callbacks to the app's action holders
struct FormHandler<'a> {
    api: &'a SharedApi,
    create_task: &'a mut CreateTask,
    edit_task: &'a mut EditTask,
    create_tag: &'a mut CreateTag,
    purpose: FormPurpose,
    board_id: Option<BoardId>,
    cancelled: bool,
    /// Whether a save was asked for, and whether its holder accepted it
    save: Option<bool>,
    /// Same for tag creation
    tag: Option<bool>,
}

impl TaskFormEvents for FormHandler<'_> {
    fn on_submit(&mut self, draft: TaskForm) {
        let started = match self.purpose {
            FormPurpose::Create { board_id } => {
                debug!("creating task on board {}", board_id);
                self.create_task
                    .create_task(self.api, draft.into_creating(board_id))
            }
            FormPurpose::Edit => {
                debug!("saving task {}", draft.id);
                self.edit_task.edit_task(self.api, draft)
            }
        };
        self.save = Some(started);
    }

    fn on_cancel(&mut self) {
        self.cancelled = true;
    }

    fn on_create_tag(&mut self, name: String) {
        let started = match self.board_id {
            Some(board_id) => self
                .create_tag
                .create_tag(self.api, CreateTagForm { board_id, name }),
            None => false,
        };
        self.tag = Some(started);
    }
}

/// Run `f` against the open form with callbacks wired to the app
fn with_form<F>(app: &mut App, f: F)
where
    F: FnOnce(&mut TaskEditForm, &mut dyn TaskFormEvents),
{
    let board_id = match app.view() {
        View::Board(id) => Some(id),
        View::Dashboard => None,
    };
    let Some(form) = app.form.as_mut() else {
        return;
    };
    let mut handler = FormHandler {
        api: &app.api,
        create_task: &mut app.create_task,
        edit_task: &mut app.edit_task,
        create_tag: &mut app.create_tag,
        purpose: form.purpose,
        board_id,
        cancelled: false,
        save: None,
        tag: None,
    };
    f(form, &mut handler);

    let (purpose, cancelled, save, tag) = (form.purpose, handler.cancelled, handler.save, handler.tag);
    if save == Some(false) {
        form.submit_completed();
    }
    if tag == Some(false) {
        form.tag_created(None);
    }

    // Results are delivered only to the form that asked for them
    let generation = app.form_generation();
    if save == Some(true) {
        match purpose {
            FormPurpose::Create { .. } => app.create_owner = generation,
            FormPurpose::Edit => app.edit_owner = generation,
        }
    }
    if tag == Some(true) {
        app.tag_owner = generation.zip(board_id);
    }
    if save == Some(false) {
        app.notify_error("a save is already in progress".to_string());
    }
    if tag == Some(false) {
        app.notify_error("a tag is already being created".to_string());
    }
    if cancelled {
        app.close_form();
    }
}

pub(super) fn handle_form_key(app: &mut App, key: KeyEvent) {
    with_form(app, |form, events| form.handle_key(key, events));
}

pub(super) fn handle_form_mouse(app: &mut App, mouse: MouseEvent) {
    with_form(app, |form, events| form.handle_mouse(mouse, events));
}

/// Submit the open form as if Save was pressed
pub fn submit_form(app: &mut App) {
    with_form(app, |form, events| {
        form.submit(events);
    });
}
