use indexmap::IndexMap;

use crate::model::{State, StateId, Task};

/// Tasks keyed by state id, in the board's state order
pub type TasksByState = IndexMap<StateId, Vec<Task>>;

/// Partition `tasks` into one bucket per state.
///
/// Every state gets a bucket (possibly empty), in the order given. Tasks whose
/// state id isn't among `states` are left out. With no states or no tasks the
/// result is empty.
pub fn order_tasks_by_state(tasks: &[Task], states: &[State]) -> TasksByState {
    if states.is_empty() || tasks.is_empty() {
        return TasksByState::new();
    }
    let mut ordered: TasksByState = states.iter().map(|s| (s.id, Vec::new())).collect();
    for task in tasks {
        if let Some(bucket) = ordered.get_mut(&task.state_id) {
            bucket.push(task.clone());
        }
    }
    ordered
}
