use serde::Serialize;

use crate::model::{Board, State, Tag, Task};
use crate::ops::grouping::TasksByState;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StateTasksJson<'a> {
    pub state_id: u64,
    pub state: &'a str,
    pub tasks: &'a [Task],
}

#[derive(Serialize)]
pub struct DeletedJson {
    pub deleted: u64,
}

/// Grouped tasks in board state order, for `tasks --json`
pub fn grouped_json<'a>(grouped: &'a TasksByState, states: &'a [State]) -> Vec<StateTasksJson<'a>> {
    grouped
        .iter()
        .map(|(state_id, tasks)| StateTasksJson {
            state_id: *state_id,
            state: state_name(states, *state_id),
            tasks,
        })
        .collect()
}

fn state_name(states: &[State], id: u64) -> &str {
    states
        .iter()
        .find(|s| s.id == id)
        .map_or("?", |s| s.name.as_str())
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn format_board_line(board: &Board) -> String {
    format!("{:>4}  {}", board.id, board.name)
}

pub fn format_state_line(state: &State) -> String {
    format!("{:>4}  {}", state.id, state.name)
}

pub fn format_tag_line(tag: &Tag) -> String {
    format!("{:>4}  #{}", tag.id, tag.name)
}

/// One task: id, name, due date, tags
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!("{:>4}  {}", task.id, task.name);
    if let Some(due) = task.due_date() {
        line.push_str(&format!("  due {}", due.format("%Y-%m-%d")));
    }
    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t.name)).collect();
        line.push_str("  ");
        line.push_str(&tags.join(" "));
    }
    line
}

/// A task with its description indented beneath, for single-task output
pub fn format_task_detail(task: &Task, state: Option<&State>) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    if let Some(state) = state {
        lines.push(format!("      state: {}", state.name));
    }
    for desc_line in task.description.lines() {
        lines.push(format!("      {}", desc_line));
    }
    lines
}

/// Tasks under a heading per state. Empty states are shown with `(none)`.
pub fn format_grouped(grouped: &TasksByState, states: &[State]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (state_id, tasks)) in grouped.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} ({})", state_name(states, *state_id), tasks.len()));
        if tasks.is_empty() {
            lines.push("  (none)".to_string());
        }
        for task in tasks {
            lines.push(format!("  {}", format_task_line(task)));
        }
    }
    lines
}
