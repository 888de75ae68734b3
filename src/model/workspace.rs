use std::path::PathBuf;

use super::config::WorkspaceConfig;
use super::store::Store;

/// A fully loaded qa workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (parent of `qa/`)
    pub root: PathBuf,
    /// Path to the `qa/` directory
    pub qa_dir: PathBuf,
    /// Parsed qa.toml
    pub config: WorkspaceConfig,
    /// Loaded entities
    pub store: Store,
}

impl Workspace {
    /// Path of the JSON store slot
    pub fn store_path(&self) -> PathBuf {
        self.qa_dir.join(&self.config.store.file)
    }
}
