//! In-process implementation of the board API, used for `--demo` and tests.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use indexmap::IndexMap;

use super::{ApiError, ApiResult, BoardApi, TaskApi};
use crate::model::{
    Board, BoardId, CreateTagForm, CreatingTask, EditingTask, State, Tag, Task, TaskForm, TaskId,
    User,
};

#[derive(Debug, Default)]
struct BoardData {
    board: Option<Board>,
    states: Vec<State>,
    tags: Vec<Tag>,
    tasks: Vec<Task>,
}

#[derive(Debug, Default)]
struct Store {
    user: Option<User>,
    boards: IndexMap<BoardId, BoardData>,
    next_id: u64,
    failure: Option<String>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_failure(&self) -> ApiResult<()> {
        match &self.failure {
            Some(msg) => Err(ApiError::Remote(msg.clone())),
            None => Ok(()),
        }
    }

    fn board(&self, board_id: BoardId) -> ApiResult<&BoardData> {
        self.boards
            .get(&board_id)
            .ok_or_else(|| ApiError::Remote(format!("board {} not found", board_id)))
    }

    fn board_mut(&mut self, board_id: BoardId) -> ApiResult<&mut BoardData> {
        self.boards
            .get_mut(&board_id)
            .ok_or_else(|| ApiError::Remote(format!("board {} not found", board_id)))
    }

    /// The board holding the task with `task_id`
    fn board_of_task(&mut self, task_id: TaskId) -> ApiResult<&mut BoardData> {
        self.boards
            .values_mut()
            .find(|b| b.tasks.iter().any(|t| t.id == task_id))
            .ok_or_else(|| ApiError::Remote(format!("task {} not found", task_id)))
    }
}

/// A board server held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryApi {
    store: Mutex<Store>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A panic while holding the lock leaves plain data behind; keep serving it
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the signed-in user (`me` fails until one is set)
    pub fn with_user(self, name: &str) -> Self {
        {
            let mut store = self.lock();
            let id = store.next_id();
            store.user = Some(User {
                id,
                name: name.to_string(),
            });
        }
        self
    }

    /// Add a board with the given workflow states; returns its id
    pub fn add_board(&self, name: &str, state_names: &[&str]) -> BoardId {
        let mut store = self.lock();
        let id = store.next_id();
        let mut states = Vec::new();
        for state_name in state_names {
            let state_id = store.next_id();
            states.push(State {
                id: state_id,
                name: state_name.to_string(),
            });
        }
        store.boards.insert(
            id,
            BoardData {
                board: Some(Board {
                    id,
                    name: name.to_string(),
                }),
                states,
                ..Default::default()
            },
        );
        id
    }

    /// Make every call fail with `message` (or succeed again with `None`)
    pub fn set_failure(&self, message: Option<&str>) {
        self.lock().failure = message.map(str::to_string);
    }

    /// A user, two boards, a handful of tags and tasks
    pub fn demo() -> Self {
        let api = MemoryApi::new().with_user("demo");
        let product = api.add_board("Product", &["Backlog", "In Progress", "Review", "Done"]);
        let home = api.add_board("Home", &["Todo", "Doing", "Done"]);

        let seed = |board_id: BoardId, tag_names: &[&str]| -> Vec<Tag> {
            tag_names
                .iter()
                .filter_map(|name| {
                    api.create_tag(&CreateTagForm {
                        board_id,
                        name: name.to_string(),
                    })
                    .ok()
                })
                .collect()
        };
        let product_tags = seed(product, &["bug", "design", "research"]);
        let home_tags = seed(home, &["errand"]);

        let product_states = api.list_states(product).unwrap_or_default();
        let home_states = api.list_states(home).unwrap_or_default();

        let add = |board_id: BoardId,
                       states: &[State],
                       state_idx: usize,
                       name: &str,
                       tags: Vec<Tag>,
                       due: Option<NaiveDate>| {
            let Some(state) = states.get(state_idx) else {
                return;
            };
            let mut form = TaskForm::blank(state.id);
            form.name = name.to_string();
            form.tags = tags;
            form.set_due_date(due);
            let _ = api.create_task(&form.into_creating(board_id));
        };

        let tag = |tags: &[Tag], i: usize| tags.get(i).cloned().into_iter().collect::<Vec<_>>();
        add(product, &product_states, 0, "Write onboarding copy", tag(&product_tags, 1), None);
        add(product, &product_states, 0, "Interview three customers", tag(&product_tags, 2), None);
        add(
            product,
            &product_states,
            1,
            "Fix login redirect loop",
            tag(&product_tags, 0),
            NaiveDate::from_ymd_opt(2026, 11, 2),
        );
        add(product, &product_states, 2, "New settings page", tag(&product_tags, 1), None);
        add(product, &product_states, 3, "Set up CI", Vec::new(), None);
        add(home, &home_states, 0, "Buy groceries", tag(&home_tags, 0), None);
        add(home, &home_states, 1, "Paint the fence", Vec::new(), None);
        api
    }
}

fn validate_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::Remote("name is required".to_string()));
    }
    Ok(())
}

fn validate_state(data: &BoardData, state_id: u64) -> ApiResult<()> {
    if data.states.iter().any(|s| s.id == state_id) {
        Ok(())
    } else {
        Err(ApiError::Remote(format!("state {} not found", state_id)))
    }
}

impl TaskApi for MemoryApi {
    fn list_tasks(&self, board_id: BoardId) -> ApiResult<Vec<Task>> {
        let store = self.lock();
        store.check_failure()?;
        Ok(store.board(board_id)?.tasks.clone())
    }

    fn create_task(&self, task: &CreatingTask) -> ApiResult<Task> {
        let mut store = self.lock();
        store.check_failure()?;
        validate_name(&task.name)?;
        validate_state(store.board(task.board_id)?, task.state_id)?;
        let id = store.next_id();
        let created = Task {
            id,
            name: task.name.clone(),
            description: task.description.clone(),
            due_at: task.due_at,
            state_id: task.state_id,
            tags: task.tags.clone(),
        };
        store.board_mut(task.board_id)?.tasks.push(created.clone());
        Ok(created)
    }

    fn edit_task(&self, task: &EditingTask) -> ApiResult<Task> {
        let mut store = self.lock();
        store.check_failure()?;
        validate_name(&task.name)?;
        let data = store.board_of_task(task.id)?;
        validate_state(data, task.state_id)?;
        let existing = data
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| ApiError::Remote(format!("task {} not found", task.id)))?;
        existing.name = task.name.clone();
        existing.description = task.description.clone();
        existing.due_at = task.due_at;
        existing.state_id = task.state_id;
        existing.tags = task.tags.clone();
        Ok(existing.clone())
    }

    fn delete_task(&self, task_id: TaskId) -> ApiResult<()> {
        let mut store = self.lock();
        store.check_failure()?;
        let data = store.board_of_task(task_id)?;
        data.tasks.retain(|t| t.id != task_id);
        Ok(())
    }
}

impl BoardApi for MemoryApi {
    fn me(&self) -> ApiResult<User> {
        let store = self.lock();
        store.check_failure()?;
        store
            .user
            .clone()
            .ok_or_else(|| ApiError::Remote("not signed in".to_string()))
    }

    fn list_boards(&self) -> ApiResult<Vec<Board>> {
        let store = self.lock();
        store.check_failure()?;
        Ok(store.boards.values().filter_map(|b| b.board.clone()).collect())
    }

    fn list_states(&self, board_id: BoardId) -> ApiResult<Vec<State>> {
        let store = self.lock();
        store.check_failure()?;
        Ok(store.board(board_id)?.states.clone())
    }

    fn list_tags(&self, board_id: BoardId) -> ApiResult<Vec<Tag>> {
        let store = self.lock();
        store.check_failure()?;
        Ok(store.board(board_id)?.tags.clone())
    }

    fn create_tag(&self, form: &CreateTagForm) -> ApiResult<Tag> {
        let mut store = self.lock();
        store.check_failure()?;
        validate_name(&form.name)?;
        let name = form.name.trim().to_string();
        if store
            .board(form.board_id)?
            .tags
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(&name))
        {
            return Err(ApiError::Remote(format!("tag '{}' already exists", name)));
        }
        let id = store.next_id();
        let tag = Tag { id, name };
        store.board_mut(form.board_id)?.tags.push(tag.clone());
        Ok(tag)
    }
}
