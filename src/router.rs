//! Paths of the form `/` (dashboard) and `/{boardId}`.

use crate::model::BoardId;

/// Reads and writes the current location
pub trait Navigator {
    /// The current path, e.g. `/42`
    fn pathname(&self) -> &str;
    /// Move to `path`
    fn navigate(&mut self, path: &str);
}

/// Path for a board, or the root path for the dashboard
pub fn board_path(board_id: Option<BoardId>) -> String {
    match board_id {
        Some(id) => format!("/{}", id),
        None => "/".to_string(),
    }
}

/// Board id encoded in a path. `None` for the root path or anything that
/// isn't a single positive integer segment.
pub fn board_id_from_path(path: &str) -> Option<BoardId> {
    let segment = path.strip_prefix('/').unwrap_or(path);
    let segment = segment.strip_suffix('/').unwrap_or(segment);
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<BoardId>().ok().filter(|id| *id > 0)
}

/// An in-process router with a navigation history
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    path: String,
    history: Vec<String>,
}

impl MemoryRouter {
    pub fn new(initial: &str) -> Self {
        let path = if initial.starts_with('/') {
            initial.to_string()
        } else {
            format!("/{}", initial)
        };
        MemoryRouter {
            path,
            history: Vec::new(),
        }
    }

    /// Every path passed to `navigate`, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        MemoryRouter::new("/")
    }
}

impl Navigator for MemoryRouter {
    fn pathname(&self) -> &str {
        &self.path
    }

    fn navigate(&mut self, path: &str) {
        self.path = path.to_string();
        self.history.push(path.to_string());
    }
}
