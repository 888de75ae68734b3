use std::fs;
use std::path::Path;

use crate::io::workspace_io::{CONFIG_FILE, WorkspaceError};
use crate::model::catalog::Template;
use crate::model::config::WorkspaceConfig;
use crate::model::entity::EntityKind;

/// Read the workspace config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(
    qa_dir: &Path,
) -> Result<(WorkspaceConfig, toml_edit::DocumentMut), Box<dyn std::error::Error>> {
    let config_path = qa_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: WorkspaceConfig =
        toml::from_str(&config_text).map_err(WorkspaceError::ConfigParseError)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(qa_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), WorkspaceError> {
    let config_path = qa_dir.join(CONFIG_FILE);
    fs::write(&config_path, doc.to_string()).map_err(|e| WorkspaceError::ReadError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

fn ensure_entities_table(doc: &mut toml_edit::DocumentMut) {
    if !doc.contains_key("entities") {
        doc["entities"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
}

/// Set `entities.kind`
pub fn set_kind(doc: &mut toml_edit::DocumentMut, kind: EntityKind) {
    ensure_entities_table(doc);
    doc["entities"]["kind"] = toml_edit::value(kind.noun());
}

/// Set `entities.template`
pub fn set_template(doc: &mut toml_edit::DocumentMut, template: Template) {
    ensure_entities_table(doc);
    doc["entities"]["template"] = toml_edit::value(template.name());
}

/// Set `entities.require_catalog`
pub fn set_require_catalog(doc: &mut toml_edit::DocumentMut, required: bool) {
    ensure_entities_table(doc);
    doc["entities"]["require_catalog"] = toml_edit::value(required);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"[workspace]
name = "test"

# How new checklists are seeded
[entities]
kind = "task"
template = "standard"
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), sample_config()).unwrap();

        let (_config, doc) = read_config(tmp.path()).unwrap();
        write_config(tmp.path(), &doc).unwrap();

        let written = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(written, sample_config());
    }

    #[test]
    fn test_set_template_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_template(&mut doc, Template::Compact);
        let result = doc.to_string();
        assert!(result.contains("template = \"compact\""));
        assert!(result.contains("# How new checklists are seeded"));
        let config: WorkspaceConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.entities.template, Template::Compact);
    }

    #[test]
    fn test_set_kind_creates_table() {
        let mut doc: toml_edit::DocumentMut = "[workspace]\nname = \"x\"\n".parse().unwrap();
        set_kind(&mut doc, EntityKind::Project);
        set_require_catalog(&mut doc, false);
        let config: WorkspaceConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.entities.kind, EntityKind::Project);
        assert!(!config.entities.require_catalog);
    }
}
