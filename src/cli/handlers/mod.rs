mod init;
pub use init::cmd_init;

use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::Utc;
use regex::RegexBuilder;

/// Override for the workspace directory (set by -C flag)
static PROJECT_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::recovery;
use crate::io::workspace_io::{self, QA_DIR, WorkspaceError};
use crate::model::catalog::{self, Template};
use crate::model::entity::{Category, Entity, EntityKind, Item};
use crate::model::workspace::Workspace;
use crate::ops::entity_ops::{self, CreateOptions, EntityError, NewEntity};
use crate::ops::item_ops::{self, DeleteOutcome};
use crate::ops::selection::{Filter, Selection};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    // Store -C override for load_workspace_cwd()
    if let Some(ref dir) = cli.project_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        let _ = PROJECT_DIR_OVERRIDE.set(abs);
    }

    match cli.command {
        None => Err("no command given (try `qa --help`)".into()),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before workspace discovery
            Commands::Init(args) => cmd_init(args, cli.project_dir.as_deref()),

            // Read commands
            Commands::Catalog => cmd_catalog(json),
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Progress(args) => cmd_progress(args, json),

            // Write commands
            Commands::New(args) => cmd_new(args, json),
            Commands::Delete(args) => cmd_delete(args),
            Commands::Toggle(args) => cmd_toggle(args, json),
            Commands::Add(args) => cmd_add(args, json),
            Commands::Remove(args) => cmd_remove(args),

            // Workspace
            Commands::Config(args) => cmd_config(args),
            Commands::Recovery(args) => cmd_recovery(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn workspace_root_cwd() -> Result<PathBuf, WorkspaceError> {
    let start = match PROJECT_DIR_OVERRIDE.get() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    workspace_io::discover_workspace(&start)
}

fn load_workspace_cwd() -> Result<Workspace, WorkspaceError> {
    let root = workspace_root_cwd()?;
    workspace_io::load_workspace(&root)
}

/// Take the store lock, then load. The lock is held until the returned
/// guard drops, so the caller's save lands before anyone else reads.
fn load_workspace_locked() -> Result<(Workspace, StoreLock), Box<dyn std::error::Error>> {
    let root = workspace_root_cwd()?;
    let lock = StoreLock::acquire_default(&root.join(QA_DIR))?;
    let workspace = workspace_io::load_workspace(&root)?;
    Ok((workspace, lock))
}

/// Persist the store. A failed write is a warning, not an error: the data
/// went to the recovery log.
fn save(workspace: &Workspace) {
    if let Err(e) = workspace_io::save_workspace_store(workspace) {
        eprintln!("warning: {}", e);
    }
}

fn find_entity<'a>(workspace: &'a Workspace, id: &str) -> Result<&'a Entity, EntityError> {
    workspace
        .store
        .get(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))
}

fn find_entity_mut<'a>(
    workspace: &'a mut Workspace,
    id: &str,
) -> Result<&'a mut Entity, EntityError> {
    workspace
        .store
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))
}

/// Resolve an item reference to its id within one category
fn resolve_item_id(entity: &Entity, category: Category, reference: &str) -> Result<String, String> {
    item_ops::resolve_item(entity.items(category), reference)
        .map(|item| item.id.clone())
        .ok_or_else(|| format!("item not found in {}: {}", category.label(), reference))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

fn cmd_catalog(json: bool) -> CmdResult {
    if json {
        let entries: Vec<_> = catalog::CATALOG.iter().map(catalog_entry_to_json).collect();
        return print_json(&entries);
    }
    for entry in catalog::CATALOG {
        println!("{}", format_catalog_entry(entry));
    }
    Ok(())
}

fn cmd_list(args: ListArgs, json: bool) -> CmdResult {
    let workspace = load_workspace_cwd()?;
    let filter: Filter = args.filter.parse()?;
    let search = args
        .search
        .as_deref()
        .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
        .transpose()?;

    let selection = Selection::new(filter);
    let entities: Vec<&Entity> = selection
        .visible(&workspace.store)
        .into_iter()
        .filter(|e| search.as_ref().is_none_or(|re| re.is_match(&e.name)))
        .collect();

    if json {
        let results: Vec<_> = entities.iter().map(|e| entity_to_summary_json(e)).collect();
        return print_json(&results);
    }
    if entities.is_empty() {
        println!("no {}s", workspace.config.entities.kind.noun());
        return Ok(());
    }
    for entity in entities {
        println!("{}", format_entity_line(entity));
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> CmdResult {
    let workspace = load_workspace_cwd()?;
    let entity = find_entity(&workspace, &args.id)?;
    if json {
        return print_json(&entity_to_detail_json(entity, true));
    }
    for line in format_entity_detail(entity) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_progress(args: ProgressArgs, json: bool) -> CmdResult {
    let workspace = load_workspace_cwd()?;
    let entity = find_entity(&workspace, &args.id)?;
    if json {
        return print_json(&entity_to_detail_json(entity, false));
    }
    for line in format_entity_progress(entity) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write handlers
// ---------------------------------------------------------------------------

fn cmd_new(args: NewArgs, json: bool) -> CmdResult {
    let (mut workspace, _lock) = load_workspace_locked()?;
    let options = CreateOptions::from(&workspace.config.entities);
    let id = entity_ops::create_entity(
        &mut workspace.store,
        NewEntity {
            name: &args.name,
            catalog_id: args.catalog.as_deref(),
        },
        options,
        Utc::now(),
    )?;
    save(&workspace);

    if json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("{}", id);
    Ok(())
}

fn cmd_delete(args: DeleteArgs) -> CmdResult {
    // Confirm outside the lock so a slow answer doesn't block other writers
    if !args.yes {
        let workspace = load_workspace_cwd()?;
        let entity = find_entity(&workspace, &args.id)?;
        eprint!(
            "Delete {} \"{}\"? [y/N] ",
            workspace.config.entities.kind.noun(),
            entity_ops::display_label(entity)
        );
        std::io::stderr().flush()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("cancelled");
            return Ok(());
        }
    }

    let (mut workspace, _lock) = load_workspace_locked()?;
    let mut selection = Selection::default();
    let removed = entity_ops::delete_entity(&mut workspace.store, &mut selection, &args.id)?;
    let removed_json = serde_json::to_string_pretty(&removed)?;
    recovery::log_entity_deletion(&workspace.qa_dir, &removed.id, &removed.name, &removed_json);
    save(&workspace);
    println!("deleted {}", removed.id);
    Ok(())
}

fn cmd_toggle(args: ToggleArgs, json: bool) -> CmdResult {
    let category: Category = args.category.parse()?;
    let (mut workspace, _lock) = load_workspace_locked()?;
    let entity = find_entity_mut(&mut workspace, &args.id)?;
    let item_id = resolve_item_id(entity, category, &args.item)?;
    item_ops::toggle(entity, category, &item_id);

    let (line, checked) = match entity.items(category).iter().find(|i| i.id == item_id) {
        Some(item) => (format_item_line_bare(item), item.checked),
        None => (String::new(), false),
    };
    save(&workspace);

    if json {
        return print_json(&serde_json::json!({ "id": item_id, "checked": checked }));
    }
    println!("{}", line);
    Ok(())
}

fn format_item_line_bare(item: &Item) -> String {
    format!("[{}] {}", if item.checked { 'x' } else { ' ' }, item.label)
}

fn cmd_add(args: AddArgs, json: bool) -> CmdResult {
    let category: Category = args.category.parse()?;
    let (mut workspace, _lock) = load_workspace_locked()?;
    let entity = find_entity_mut(&mut workspace, &args.id)?;
    let id = item_ops::add_custom(entity, category, &args.label, Utc::now())?;
    save(&workspace);

    if json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("{}", id);
    Ok(())
}

fn cmd_remove(args: RemoveArgs) -> CmdResult {
    let category: Category = args.category.parse()?;
    let (mut workspace, _lock) = load_workspace_locked()?;
    let entity = find_entity_mut(&mut workspace, &args.id)?;
    let item_id = resolve_item_id(entity, category, &args.item)?;

    match item_ops::delete_custom(entity, category, &item_id) {
        DeleteOutcome::Removed(item) => {
            save(&workspace);
            println!("removed: {}", item.label);
            Ok(())
        }
        DeleteOutcome::Predefined => {
            Err(format!("cannot remove predefined item: {}", item_id).into())
        }
        DeleteOutcome::NotFound => {
            Err(format!("item not found in {}: {}", category.label(), args.item).into())
        }
    }
}

// ---------------------------------------------------------------------------
// Workspace handlers
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd) -> CmdResult {
    let qa_dir = workspace_root_cwd()?.join(QA_DIR);
    let (_config, mut doc) = config_io::read_config(&qa_dir)?;

    match args.action {
        ConfigAction::Kind { value } => {
            let kind: EntityKind = value.parse()?;
            config_io::set_kind(&mut doc, kind);
            println!("kind = {}", kind.noun());
        }
        ConfigAction::Template { value } => {
            let template: Template = value.parse()?;
            config_io::set_template(&mut doc, template);
            println!("template = {}", template.name());
        }
        ConfigAction::RequireCatalog { value } => {
            config_io::set_require_catalog(&mut doc, value);
            println!("require_catalog = {}", value);
        }
    }

    config_io::write_config(&qa_dir, &doc)?;
    Ok(())
}

fn cmd_recovery(args: RecoveryArgs, json: bool) -> CmdResult {
    let qa_dir = workspace_root_cwd()?.join(QA_DIR);
    let entries = recovery::read_recovery_entries(&qa_dir, Some(args.limit.unwrap_or(10)));

    if json {
        let values: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
        return print_json(&values);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_display_markdown());
    }
    Ok(())
}
