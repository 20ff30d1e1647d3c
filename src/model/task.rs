use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::board::{BoardId, StateId};
use super::tag::{Tag, TagId};

pub type TaskId = u64;

/// A task as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub state_id: StateId,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Task {
    /// Due date without the time part
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_at.map(|d| d.date_naive())
    }

    pub fn has_tag(&self, id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }
}

/// The in-progress local edit of a task. Submitted as-is when editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub state_id: StateId,
    pub tags: Vec<Tag>,
}

/// Body of an edit request
pub type EditingTask = TaskForm;

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatingTask {
    pub board_id: BoardId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub state_id: StateId,
    pub tags: Vec<Tag>,
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        TaskForm {
            id: task.id,
            name: task.name.clone(),
            description: task.description.clone(),
            due_at: task.due_at,
            state_id: task.state_id,
            tags: task.tags.clone(),
        }
    }
}

impl TaskForm {
    /// An empty draft for a task that doesn't exist yet (id 0)
    pub fn blank(state_id: StateId) -> Self {
        TaskForm {
            id: 0,
            name: String::new(),
            description: String::new(),
            due_at: None,
            state_id,
            tags: Vec::new(),
        }
    }

    pub fn has_tag(&self, id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }

    /// Toggle tag membership by id: a present tag is removed, an absent one appended.
    pub fn toggle_tag(&mut self, tag: &Tag) {
        if self.has_tag(tag.id) {
            self.tags.retain(|t| t.id != tag.id);
        } else {
            self.tags.push(tag.clone());
        }
    }

    /// Set the due date from a calendar date (midnight UTC), or clear it
    pub fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.due_at = date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_at.map(|d| d.date_naive())
    }

    /// Turn this draft into a create request for `board_id`
    pub fn into_creating(self, board_id: BoardId) -> CreatingTask {
        CreatingTask {
            board_id,
            name: self.name,
            description: self.description,
            due_at: self.due_at,
            state_id: self.state_id,
            tags: self.tags,
        }
    }
}

/// Parse a `YYYY-MM-DD` due date. Empty input means "no due date".
pub fn parse_due_date(text: &str) -> Result<Option<NaiveDate>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", text))
}
