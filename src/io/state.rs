use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Active filter: "all" or a catalog id
    #[serde(default)]
    pub filter: Option<String>,
    /// Selected entity id
    #[serde(default)]
    pub selected: Option<String>,
    /// Cursor into the selected entity's flattened item list
    #[serde(default)]
    pub cursor: usize,
    /// Last entity name search
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read .state.json from the qa directory
pub fn read_ui_state(qa_dir: &Path) -> Option<UiState> {
    let path = qa_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the qa directory
pub fn write_ui_state(qa_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = qa_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            filter: Some("wts".into()),
            selected: Some("task_1718000000000".into()),
            cursor: 4,
            last_search: Some("login".into()),
        };

        write_ui_state(dir.path(), &state).unwrap();
        assert_eq!(read_ui_state(dir.path()), Some(state));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, UiState::default());
    }
}
