use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog::Template;
use super::entity::EntityKind;

/// Configuration from qa.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub entities: EntityConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub name: String,
}

/// How entities are named, linked to the catalog, and seeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub kind: EntityKind,
    /// New entities must be linked to a catalog entry
    #[serde(default = "default_true")]
    pub require_catalog: bool,
    #[serde(default)]
    pub template: Template,
}

impl Default for EntityConfig {
    fn default() -> Self {
        EntityConfig {
            kind: EntityKind::Task,
            require_catalog: true,
            template: Template::Standard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file name inside qa/
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_store_file() -> String {
    "tasks.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-catalog color overrides, keyed by catalog id
    #[serde(default)]
    pub catalog_colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            catalog_colors: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: WorkspaceConfig = toml::from_str("").unwrap();
        assert_eq!(config.entities.kind, EntityKind::Task);
        assert!(config.entities.require_catalog);
        assert_eq!(config.entities.template, Template::Standard);
        assert_eq!(config.store.file, "tasks.json");
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn project_variant_config() {
        let config: WorkspaceConfig = toml::from_str(
            r##"
[workspace]
name = "agency"

[entities]
kind = "project"
require_catalog = false
template = "compact"

[store]
file = "projects.json"

[ui.catalog_colors]
wts = "#000000"
"##,
        )
        .unwrap();
        assert_eq!(config.workspace.name, "agency");
        assert_eq!(config.entities.kind, EntityKind::Project);
        assert!(!config.entities.require_catalog);
        assert_eq!(config.entities.template, Template::Compact);
        assert_eq!(config.store.file, "projects.json");
        assert_eq!(config.ui.catalog_colors.get("wts").unwrap(), "#000000");
    }
}
