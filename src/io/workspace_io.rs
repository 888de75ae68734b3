use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::config::WorkspaceConfig;
use crate::model::store::Store;
use crate::model::workspace::Workspace;

/// Name of the directory that marks a qa workspace
pub const QA_DIR: &str = "qa";

/// Name of the config file inside `qa/`
pub const CONFIG_FILE: &str = "qa.toml";

/// Error type for workspace I/O operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a qa workspace: no qa/qa.toml found (run `qa init`)")]
    NotAWorkspace,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse qa.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Error type for store persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("error saving data to {path}, your changes may not persist: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Discover the workspace by walking up from the given directory,
/// looking for a `qa/qa.toml`.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let qa_dir = current.join(QA_DIR);
        if qa_dir.is_dir() && qa_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Load a complete workspace (config and store) from its root directory.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let qa_dir = root.join(QA_DIR);
    if !qa_dir.is_dir() {
        return Err(WorkspaceError::NotAWorkspace);
    }

    let config_path = qa_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: WorkspaceConfig = toml::from_str(&config_text)?;

    let store = load_store(&qa_dir, &config.store.file);

    Ok(Workspace {
        root: root.to_path_buf(),
        qa_dir,
        config,
        store,
    })
}

/// Read the store slot. A missing file is an empty store; an unreadable or
/// malformed one is also an empty store, with the raw content preserved in
/// the recovery log.
pub fn load_store(qa_dir: &Path, file: &str) -> Store {
    let path = qa_dir.join(file);
    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Store::new(),
        Err(e) => {
            log_unreadable_store(qa_dir, file, e.to_string(), Vec::new(), String::new());
            return Store::new();
        }
    };

    let content = match String::from_utf8(bytes) {
        Ok(c) => c,
        Err(e) => {
            let error = e.utf8_error().to_string();
            let bytes = e.into_bytes();
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            let body = String::from_utf8_lossy(&bytes).into_owned();
            log_unreadable_store(qa_dir, file, error, vec![("Raw".to_string(), hex)], body);
            return Store::new();
        }
    };
    if content.trim().is_empty() {
        return Store::new();
    }

    match serde_json::from_str::<Store>(&content) {
        Ok(store) => store,
        Err(e) => {
            log_unreadable_store(qa_dir, file, e.to_string(), Vec::new(), content);
            Store::new()
        }
    }
}

fn log_unreadable_store(
    qa_dir: &Path,
    file: &str,
    error: String,
    extra: Vec<(String, String)>,
    body: String,
) {
    let mut fields = vec![
        ("Source".to_string(), file.to_string()),
        ("Error".to_string(), error),
    ];
    fields.extend(extra);
    recovery::log_recovery(
        qa_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Parser,
            description: "unreadable store reset to empty".to_string(),
            fields,
            body,
        },
    );
}

/// Serialize the whole store and write it atomically. On failure the blob is
/// appended to the recovery log; the in-memory store is left untouched.
pub fn save_store(qa_dir: &Path, file: &str, store: &Store) -> Result<(), StoreError> {
    let path = qa_dir.join(file);
    let mut content = serde_json::to_string_pretty(store)?;
    content.push('\n');
    if let Err(e) = recovery::atomic_write(&path, content.as_bytes()) {
        recovery::log_recovery(
            qa_dir,
            RecoveryEntry {
                timestamp: Utc::now(),
                category: RecoveryCategory::Write,
                description: "store write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), file.to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(StoreError::Write { path, source: e });
    }
    Ok(())
}

/// Save the workspace's store to its configured slot
pub fn save_workspace_store(workspace: &Workspace) -> Result<(), StoreError> {
    save_store(&workspace.qa_dir, &workspace.config.store.file, &workspace.store)
}
