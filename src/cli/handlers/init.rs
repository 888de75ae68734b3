use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::workspace_io::{self, CONFIG_FILE, QA_DIR};
use crate::model::catalog::Template;
use crate::model::entity::EntityKind;

const QA_TOML_TEMPLATE: &str = r##"[workspace]
name = ""

# How new checklists are created.
#   kind             "task" or "project"
#   require_catalog  new checklists must be linked to a catalog entry
#   template         "standard" (long lists) or "compact"
[entities]
kind = "task"
require_catalog = true
template = "standard"

[store]
# JSON file inside qa/ holding every checklist
file = "tasks.json"

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#0F172A"
# text = "#CBD5E1"
# text_bright = "#FFFFFF"
# highlight = "#3B82F6"
# dim = "#64748B"
# red = "#EF4444"
# yellow = "#F59E0B"
# green = "#22C55E"
#
# [ui.catalog_colors]
# wts = "#3B82F6"
# caritas = "#F59E0B"
"##;

/// Infer a workspace name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render qa.toml from the template with the chosen settings filled in.
fn render_qa_toml(
    name: &str,
    kind: EntityKind,
    template: Template,
    require_catalog: bool,
) -> Result<String, toml_edit::TomlError> {
    let mut doc: toml_edit::DocumentMut = QA_TOML_TEMPLATE.parse()?;
    doc["workspace"]["name"] = toml_edit::value(name);
    config_io::set_kind(&mut doc, kind);
    config_io::set_template(&mut doc, template);
    config_io::set_require_catalog(&mut doc, require_catalog);
    Ok(doc.to_string())
}

pub fn cmd_init(
    args: InitArgs,
    project_dir: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cwd: PathBuf = match project_dir {
        Some(dir) => fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let qa_dir = cwd.join(QA_DIR);

    if qa_dir.join(CONFIG_FILE).exists() && !args.force {
        return Err("qa workspace already exists in ./qa/ (use --force to reinitialize)".into());
    }

    // Nested workspaces are allowed, but say so
    if let Some(parent) = cwd.parent()
        && let Ok(parent_root) = workspace_io::discover_workspace(parent)
    {
        eprintln!(
            "Note: parent workspace found at {}/",
            parent_root.join(QA_DIR).display()
        );
        eprintln!("Creating new workspace in ./qa/");
    }

    let kind: EntityKind = match args.kind.as_deref() {
        Some(k) => k.parse()?,
        None => EntityKind::default(),
    };
    let template: Template = match args.template.as_deref() {
        Some(t) => t.parse()?,
        None => Template::default(),
    };

    let name = args.name.unwrap_or_else(|| default_name(&cwd));

    fs::create_dir_all(&qa_dir)?;
    let toml_content = render_qa_toml(&name, kind, template, !args.no_catalog)?;
    fs::write(qa_dir.join(CONFIG_FILE), toml_content)?;

    println!("Initialized qa workspace: {}", name);
    println!("  kind: {}  template: {}", kind.noun(), template.name());
    Ok(())
}

fn default_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(infer_name)
        .unwrap_or_else(|| "Untitled".to_string())
}
