use serde::{Deserialize, Serialize};

pub type BoardId = u64;
pub type StateId = u64;

/// A named collection of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
}

/// A workflow column. Tasks point at one through `state_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
}

/// Find a state by numeric id or (case-insensitive) name
pub fn find_state<'a>(states: &'a [State], key: &str) -> Option<&'a State> {
    if let Ok(id) = key.parse::<StateId>() {
        return states.iter().find(|s| s.id == id);
    }
    states.iter().find(|s| s.name.eq_ignore_ascii_case(key))
}
