use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to state.json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiState {
    /// Router path when the TUI last exited ("/" or "/{boardId}")
    #[serde(default = "root_path")]
    pub path: String,
    /// Last search pattern
    #[serde(default)]
    pub last_search: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            path: root_path(),
            last_search: None,
        }
    }
}

fn root_path() -> String {
    "/".to_string()
}

/// Default location of state.json
pub fn default_state_path() -> PathBuf {
    super::config_dir().join("state.json")
}

/// Read state.json. Missing or unreadable files yield `None`.
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json
pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    super::atomic_write(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let state = UiState {
            path: "/12".into(),
            last_search: Some("login".into()),
        };
        write_ui_state(&path, &state).unwrap();
        assert_eq!(read_ui_state(&path), Some(state));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(&dir.path().join("state.json")).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json {{{").unwrap();
        assert!(read_ui_state(&path).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, UiState::default());
        assert_eq!(state.path, "/");
    }
}
