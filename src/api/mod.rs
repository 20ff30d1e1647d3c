//! Client side of the board API.
//!
//! [`TaskApi`] and [`BoardApi`] describe the remote calls; [`HttpApi`] talks
//! to a real server and [`MemoryApi`] keeps everything in process (demo mode
//! and tests). Calls are blocking; [`request::spawn`] moves one onto a worker
//! thread so the UI can keep drawing.

pub mod http;
pub mod memory;
pub mod request;

use std::sync::Arc;

use crate::model::{
    Board, BoardId, CreateTagForm, CreatingTask, EditingTask, State, Tag, Task, TaskId, User,
};

pub use http::HttpApi;
pub use memory::MemoryApi;
pub use request::Pending;

/// Error type for remote calls. The display text is what users see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with an error message
    #[error("{0}")]
    Remote(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Task endpoints
pub trait TaskApi: Send + Sync {
    fn list_tasks(&self, board_id: BoardId) -> ApiResult<Vec<Task>>;
    fn create_task(&self, task: &CreatingTask) -> ApiResult<Task>;
    fn edit_task(&self, task: &EditingTask) -> ApiResult<Task>;
    fn delete_task(&self, task_id: TaskId) -> ApiResult<()>;
}

/// Board, state, tag and session endpoints
pub trait BoardApi: Send + Sync {
    fn me(&self) -> ApiResult<User>;
    fn list_boards(&self) -> ApiResult<Vec<Board>>;
    fn list_states(&self, board_id: BoardId) -> ApiResult<Vec<State>>;
    fn list_tags(&self, board_id: BoardId) -> ApiResult<Vec<Tag>>;
    fn create_tag(&self, form: &CreateTagForm) -> ApiResult<Tag>;
}

/// Everything the client needs from a server
pub trait KanbanApi: TaskApi + BoardApi {}

impl<T: TaskApi + BoardApi> KanbanApi for T {}

/// Handle shared between the UI and request worker threads
pub type SharedApi = Arc<dyn KanbanApi>;
