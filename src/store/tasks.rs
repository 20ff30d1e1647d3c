use log::{debug, warn};

use super::{Action, Outcome};
use crate::api::SharedApi;
use crate::api::request::{self, Pending};
use crate::model::{BoardId, CreatingTask, EditingTask, Task, TaskId};

/// The task list of one board.
///
/// Changing the board (or resetting) clears tasks, error and loading, and
/// drops any response still in flight for the previous board.
#[derive(Debug, Default)]
pub struct Tasks {
    board_id: Option<BoardId>,
    pub loading: bool,
    pub error: String,
    tasks: Vec<Task>,
    pending: Option<Pending<Vec<Task>>>,
}

impl Tasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board_id(&self) -> Option<BoardId> {
        self.board_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Point the list at a board, fetching its tasks. No-op if unchanged.
    pub fn set_board(&mut self, api: &SharedApi, board_id: Option<BoardId>) {
        if self.board_id == board_id {
            return;
        }
        self.reset();
        self.board_id = board_id;
        self.fetch(api);
    }

    /// Fetch the current board's tasks again from scratch
    pub fn reload(&mut self, api: &SharedApi) {
        let board_id = self.board_id;
        self.reset();
        self.board_id = board_id;
        self.fetch(api);
    }

    /// Clear everything, abandoning any in-flight response
    pub fn reset(&mut self) {
        self.board_id = None;
        self.loading = false;
        self.error.clear();
        self.tasks.clear();
        self.pending = None;
    }

    fn fetch(&mut self, api: &SharedApi) {
        let Some(board_id) = self.board_id else {
            return;
        };
        debug!("fetching tasks for board {}", board_id);
        self.loading = true;
        let api = api.clone();
        self.pending = Some(request::spawn(move || api.list_tasks(board_id)));
    }

    /// Collect a finished fetch. Returns true if state changed.
    pub fn poll(&mut self) -> bool {
        let Some(result) = self.pending.as_ref().and_then(|p| p.try_take()) else {
            return false;
        };
        self.pending = None;
        self.settle(result);
        true
    }

    /// Block until the in-flight fetch (if any) finishes
    pub fn wait(&mut self) {
        if let Some(pending) = self.pending.take() {
            let result = pending.wait();
            self.settle(result);
        }
    }

    fn settle(&mut self, result: crate::api::ApiResult<Vec<Task>>) {
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.error.clear();
                self.tasks = tasks;
            }
            Err(e) => {
                warn!("could not load tasks: {}", e);
                self.error = e.to_string();
            }
        }
    }

    /// Replace the whole list
    pub fn update_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Replace the task with the same id, or append it
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn remove(&mut self, task_id: TaskId) {
        self.tasks.retain(|t| t.id != task_id);
    }
}

/// Creates tasks
#[derive(Debug, Default)]
pub struct CreateTask {
    action: Action<Task>,
}

impl CreateTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start creating `task`. Returns false if a create is already in flight.
    pub fn create_task(&mut self, api: &SharedApi, task: CreatingTask) -> bool {
        let api = api.clone();
        self.action.start(move || api.create_task(&task))
    }

    pub fn poll(&mut self) -> Option<Outcome<Task>> {
        self.action.poll()
    }

    pub fn wait(&mut self) -> Option<Outcome<Task>> {
        self.action.wait()
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}

/// Saves edits to existing tasks
#[derive(Debug, Default)]
pub struct EditTask {
    action: Action<Task>,
}

impl EditTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start saving `task`. Returns false if a save is already in flight.
    pub fn edit_task(&mut self, api: &SharedApi, task: EditingTask) -> bool {
        let api = api.clone();
        self.action.start(move || api.edit_task(&task))
    }

    pub fn poll(&mut self) -> Option<Outcome<Task>> {
        self.action.poll()
    }

    pub fn wait(&mut self) -> Option<Outcome<Task>> {
        self.action.wait()
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}

/// Deletes tasks. Succeeds with the deleted task's id.
#[derive(Debug, Default)]
pub struct DeleteTask {
    action: Action<TaskId>,
}

impl DeleteTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start deleting `task_id`. Returns false if a delete is already in flight.
    pub fn delete_task(&mut self, api: &SharedApi, task_id: TaskId) -> bool {
        let api = api.clone();
        self.action
            .start(move || api.delete_task(task_id).map(|()| task_id))
    }

    pub fn poll(&mut self) -> Option<Outcome<TaskId>> {
        self.action.poll()
    }

    pub fn wait(&mut self) -> Option<Outcome<TaskId>> {
        self.action.wait()
    }

    pub fn loading(&self) -> bool {
        self.action.loading
    }

    pub fn error(&self) -> &str {
        &self.action.error
    }
}
