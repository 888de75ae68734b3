use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qa", about = concat!("[x] qa v", env!("CARGO_PKG_VERSION"), " - checklists for web QA"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new qa workspace in the current directory
    Init(InitArgs),
    /// List catalog entries that checklists can be linked to
    Catalog,
    /// List checklists with their overall progress
    List(ListArgs),
    /// Show a checklist's items
    Show(ShowArgs),
    /// Show per-category progress for a checklist
    Progress(ProgressArgs),
    /// Create a checklist seeded from the templates
    New(NewArgs),
    /// Delete a checklist
    Delete(DeleteArgs),
    /// Check or uncheck an item
    Toggle(ToggleArgs),
    /// Add a custom item to a category
    Add(AddArgs),
    /// Remove a custom item
    Remove(RemoveArgs),
    /// Change workspace settings in qa.toml
    Config(ConfigCmd),
    /// View the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Workspace name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Entity kind: task or project
    #[arg(long)]
    pub kind: Option<String>,
    /// Template set: standard or compact
    #[arg(long)]
    pub template: Option<String>,
    /// Don't require a catalog entry for new checklists
    #[arg(long)]
    pub no_catalog: bool,
    /// Reinitialize even if qa/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Catalog filter: "all" or a catalog id
    #[arg(long, default_value = "all")]
    pub filter: String,
    /// Only names matching this regex
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Checklist id
    pub id: String,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Checklist id
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NewArgs {
    /// Checklist name
    pub name: String,
    /// Catalog entry to link (see `qa catalog`)
    #[arg(long)]
    pub catalog: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Checklist id
    pub id: String,
    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Checklist id
    pub id: String,
    /// Category: uiux, functionality or responsive
    pub category: String,
    /// Item id or 1-based position
    pub item: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Checklist id
    pub id: String,
    /// Category: uiux, functionality or responsive
    pub category: String,
    /// Item description
    pub label: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Checklist id
    pub id: String,
    /// Category: uiux, functionality or responsive
    pub category: String,
    /// Item id or 1-based position
    pub item: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set the entity kind (task or project)
    Kind { value: String },
    /// Set the template set (standard or compact)
    Template { value: String },
    /// Require a catalog entry for new checklists (true or false)
    RequireCatalog {
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}
