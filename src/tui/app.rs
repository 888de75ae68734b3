use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::lock::StoreLock;
use crate::io::recovery;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::watcher::{FileEvent, StoreWatcher};
use crate::io::workspace_io::{self, discover_workspace, load_workspace};
use crate::model::catalog::CATALOG;
use crate::model::entity::{Category, Entity, Item};
use crate::model::workspace::Workspace;
use crate::ops::entity_ops::{self, CreateOptions, NewEntity};
use crate::ops::item_ops::{self, DeleteOutcome};
use crate::ops::selection::{Filter, Handoff, Selection};

use super::input;
use super::render;
use super::theme::Theme;

/// How long a keypress waits for a CLI writer before giving up
const TUI_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a custom item label
    Edit,
    /// New-entity dialog open
    Dialog,
    /// Waiting for y/n
    Confirm,
    /// Typing an entity name search
    Search,
}

/// One row of the checklist: a category header or an item within it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatRow {
    Header(Category),
    Item(Category, usize),
}

impl FlatRow {
    pub fn category(self) -> Category {
        match self {
            FlatRow::Header(c) | FlatRow::Item(c, _) => c,
        }
    }
}

/// State of the new-entity dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntityDialog {
    pub name: String,
    /// Byte offset of the cursor in `name`
    pub cursor: usize,
    /// Index into the catalog; None means no catalog entry chosen
    pub catalog_index: Option<usize>,
}

impl NewEntityDialog {
    pub fn catalog_id(&self) -> Option<&'static str> {
        self.catalog_index
            .and_then(|i| CATALOG.get(i))
            .map(|e| e.id)
    }

    /// Step through the catalog choices. "None" is only offered when a
    /// catalog entry isn't required.
    pub fn cycle_catalog(&mut self, forward: bool, allow_none: bool) {
        let len = CATALOG.len();
        if len == 0 {
            return;
        }
        self.catalog_index = match (self.catalog_index, forward) {
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(_), true) => {
                if allow_none {
                    None
                } else {
                    Some(0)
                }
            }
            (Some(0), false) => {
                if allow_none {
                    None
                } else {
                    Some(len - 1)
                }
            }
            (Some(i), false) => Some(i - 1),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteEntity { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    /// Non-blocking; shown until the next key
    Warning,
    /// Validation failure
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub selection: Selection,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the flat row list of the active entity
    pub cursor: usize,
    /// First visible content row
    pub scroll_offset: usize,
    /// Text being typed in Edit and Search modes
    pub edit_buffer: String,
    /// Byte offset of the cursor in `edit_buffer`
    pub edit_cursor: usize,
    /// Category a custom item is being added to
    pub edit_category: Option<Category>,
    pub dialog: Option<NewEntityDialog>,
    pub confirm_state: Option<ConfirmState>,
    pub show_help: bool,
    /// Last executed search pattern
    pub last_search: Option<String>,
    pub status_message: Option<StatusMessage>,
    /// Suppresses the watcher reload triggered by our own write
    pub pending_self_writes: usize,
    /// Store file bytes as of our last load or save
    pub disk_snapshot: Option<Vec<u8>>,
}

impl App {
    pub fn new(workspace: Workspace) -> Self {
        let theme = Theme::from_config(&workspace.config.ui);
        let disk_snapshot = std::fs::read(workspace.store_path()).ok();
        let mut app = App {
            workspace,
            selection: Selection::default(),
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            cursor: 0,
            scroll_offset: 0,
            edit_buffer: String::new(),
            edit_cursor: 0,
            edit_category: None,
            dialog: None,
            confirm_state: None,
            show_help: false,
            last_search: None,
            status_message: None,
            pending_self_writes: 0,
            disk_snapshot,
        };
        // Start on the first entity if there is one
        let store = &app.workspace.store;
        app.selection.step(store, true);
        app
    }

    pub fn active_entity(&self) -> Option<&Entity> {
        self.selection.active_entity(&self.workspace.store)
    }

    fn active_entity_mut(&mut self) -> Option<&mut Entity> {
        let id = self.selection.active()?.to_string();
        self.workspace.store.get_mut(&id)
    }

    /// Entities shown in the selector under the current filter
    pub fn visible_entities(&self) -> Vec<&Entity> {
        self.selection.visible(&self.workspace.store)
    }

    /// Headers and items of the active entity, in display order
    pub fn flat_rows(&self) -> Vec<FlatRow> {
        let Some(entity) = self.active_entity() else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for category in Category::ALL {
            rows.push(FlatRow::Header(category));
            rows.extend((0..entity.items(category).len()).map(|i| FlatRow::Item(category, i)));
        }
        rows
    }

    pub fn cursor_row(&self) -> Option<FlatRow> {
        self.flat_rows().get(self.cursor).copied()
    }

    /// The item under the cursor, if the cursor is on an item
    pub fn cursor_item(&self) -> Option<(Category, &Item)> {
        match self.cursor_row()? {
            FlatRow::Item(category, idx) => self
                .active_entity()
                .and_then(|e| e.items(category).get(idx))
                .map(|item| (category, item)),
            FlatRow::Header(_) => None,
        }
    }

    /// Category the cursor is in (headers count)
    pub fn cursor_category(&self) -> Category {
        self.cursor_row()
            .map(FlatRow::category)
            .unwrap_or(Category::Uiux)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.flat_rows().len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.flat_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    /// Put the cursor on the first item of a category (or its header when empty)
    fn jump_to_category(&mut self, category: Category) {
        if let Some(pos) = self
            .flat_rows()
            .iter()
            .position(|r| *r == FlatRow::Header(category))
        {
            self.cursor = pos;
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// Get the active search regex for highlighting
    pub fn active_search_re(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Search if !self.edit_buffer.is_empty() => &self.edit_buffer,
            Mode::Navigate => self.last_search.as_deref()?,
            _ => return None,
        };
        search_regex(pattern)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Apply `mutate` as one load-mutate-save step under the workspace lock.
    /// The store is reloaded first if another process changed the file since
    /// our last load or save. `mutate` returns None when nothing changed.
    /// Without the lock the change stays in memory and nothing is written.
    fn commit<T>(&mut self, mutate: impl FnOnce(&mut App) -> Option<T>) -> Option<T> {
        let _lock = match StoreLock::acquire(&self.workspace.qa_dir, TUI_LOCK_TIMEOUT) {
            Ok(lock) => lock,
            Err(e) => {
                let out = mutate(self);
                if out.is_some() {
                    self.set_status(StatusKind::Warning, format!("{}; change not saved", e));
                }
                return out;
            }
        };
        self.sync_from_disk();
        let out = mutate(self)?;
        self.save_store();
        Some(out)
    }

    /// Reload the store if the file no longer matches what we last saw
    fn sync_from_disk(&mut self) {
        let current = std::fs::read(self.workspace.store_path()).ok();
        if current != self.disk_snapshot {
            self.reload_store();
        }
    }

    /// Write the store. Failures become a non-blocking warning; the
    /// in-memory store stays authoritative. Callers hold the lock.
    fn save_store(&mut self) {
        match workspace_io::save_workspace_store(&self.workspace) {
            Ok(()) => {
                self.pending_self_writes += 1;
                self.disk_snapshot = std::fs::read(self.workspace.store_path()).ok();
            }
            Err(e) => self.set_status(StatusKind::Warning, e.to_string()),
        }
    }

    /// Reload the store after another process wrote it
    pub fn reload_store(&mut self) {
        self.disk_snapshot = std::fs::read(self.workspace.store_path()).ok();
        self.workspace.store =
            workspace_io::load_store(&self.workspace.qa_dir, &self.workspace.config.store.file);
        self.selection.resync(&self.workspace.store, Handoff::default());
        self.clamp_cursor();
    }

    pub fn handle_file_events(&mut self, events: Vec<FileEvent>) {
        let mut changed = false;
        for event in events {
            match event {
                FileEvent::StoreChanged(_) => {
                    if self.pending_self_writes > 0 {
                        self.pending_self_writes -= 1;
                    } else {
                        changed = true;
                    }
                }
            }
        }
        if changed {
            self.reload_store();
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn toggle_cursor_item(&mut self) {
        let Some((category, item_id)) = self.cursor_item().map(|(c, i)| (c, i.id.clone())) else {
            return;
        };
        self.commit(|app| {
            app.active_entity_mut()
                .is_some_and(|e| item_ops::toggle(e, category, &item_id))
                .then_some(())
        });
    }

    /// Add a custom item to `category` of the active entity. Returns false
    /// on validation failure (message already set).
    pub fn add_custom_item(&mut self, category: Category, label: &str) -> bool {
        if self.active_entity().is_none() {
            return false;
        }
        let added = self.commit(|app| {
            let entity = app.active_entity_mut()?;
            match item_ops::add_custom(entity, category, label, Utc::now()) {
                Ok(id) => Some(id),
                Err(e) => {
                    app.set_status(StatusKind::Error, e.to_string());
                    None
                }
            }
        });
        let Some(id) = added else {
            return false;
        };
        // Land on the new item
        if let Some(pos) = self.flat_rows().iter().position(|r| match r {
            FlatRow::Item(c, idx) => {
                *c == category
                    && self
                        .active_entity()
                        .and_then(|e| e.items(category).get(*idx))
                        .is_some_and(|i| i.id == id)
            }
            FlatRow::Header(_) => false,
        }) {
            self.cursor = pos;
        }
        true
    }

    /// Delete the custom item under the cursor. Predefined items are ignored.
    pub fn delete_cursor_item(&mut self) {
        let Some((category, item_id)) = self.cursor_item().map(|(c, i)| (c, i.id.clone())) else {
            return;
        };
        let removed = self.commit(|app| {
            let entity = app.active_entity_mut()?;
            match item_ops::delete_custom(entity, category, &item_id) {
                DeleteOutcome::Removed(item) => Some(item),
                DeleteOutcome::Predefined | DeleteOutcome::NotFound => None,
            }
        });
        if removed.is_some() {
            self.clamp_cursor();
        }
    }

    /// Create an entity from the dialog. Returns false on validation failure.
    pub fn create_entity(&mut self, dialog: &NewEntityDialog) -> bool {
        let options = CreateOptions::from(&self.workspace.config.entities);
        let created = self.commit(|app| {
            let result = entity_ops::create_entity(
                &mut app.workspace.store,
                NewEntity {
                    name: &dialog.name,
                    catalog_id: dialog.catalog_id(),
                },
                options,
                Utc::now(),
            );
            match result {
                Ok(id) => Some(id),
                Err(e) => {
                    app.set_status(StatusKind::Error, e.to_string());
                    None
                }
            }
        });
        let Some(id) = created else {
            return false;
        };
        let handoff = self
            .workspace
            .store
            .get(&id)
            .map(Handoff::for_created)
            .unwrap_or_default();
        self.selection.resync(&self.workspace.store, handoff);
        self.cursor = 0;
        self.scroll_offset = 0;
        true
    }

    pub fn delete_entity(&mut self, id: &str) {
        let removed = self.commit(|app| {
            match entity_ops::delete_entity(&mut app.workspace.store, &mut app.selection, id) {
                Ok(removed) => {
                    if let Ok(json) = serde_json::to_string_pretty(&removed) {
                        recovery::log_entity_deletion(
                            &app.workspace.qa_dir,
                            &removed.id,
                            &removed.name,
                            &json,
                        );
                    }
                    Some(removed)
                }
                Err(e) => {
                    app.set_status(StatusKind::Error, e.to_string());
                    None
                }
            }
        });
        if let Some(removed) = removed {
            self.cursor = 0;
            self.scroll_offset = 0;
            if self.status_message.is_none() {
                self.set_status(StatusKind::Info, format!("deleted {}", removed.name));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn step_entity(&mut self, forward: bool) {
        self.selection.step(&self.workspace.store, forward);
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Cycle the filter and select the first entity it shows
    pub fn cycle_filter(&mut self, forward: bool) {
        let next = self.selection.filter().cycle(forward);
        self.set_filter(next);
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.selection.set_filter(filter);
        self.selection.step(&self.workspace.store, true);
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Select the next visible entity whose name matches `pattern`,
    /// searching after the current one and wrapping. Returns whether one matched.
    pub fn search_entities(&mut self, pattern: &str, forward: bool) -> bool {
        let Some(re) = search_regex(pattern) else {
            return false;
        };
        let visible = self.visible_entities();
        if visible.is_empty() {
            return false;
        }
        let len = visible.len();
        let start = self
            .selection
            .active()
            .and_then(|id| visible.iter().position(|e| e.id == id));
        let found = (1..=len)
            .map(|step| match (start, forward) {
                (Some(s), true) => (s + step) % len,
                (Some(s), false) => (s + len * 2 - step) % len,
                (None, _) => step - 1,
            })
            .find(|&i| re.is_match(&visible[i].name))
            .map(|i| visible[i].id.clone());
        match found {
            Some(id) => {
                self.selection.select(&self.workspace.store, &id);
                self.cursor = 0;
                self.scroll_offset = 0;
                true
            }
            None => false,
        }
    }

    pub fn start_add_item(&mut self) {
        if self.active_entity().is_none() {
            return;
        }
        let category = self.cursor_category();
        self.jump_to_category(category);
        self.edit_category = Some(category);
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.mode = Mode::Edit;
    }
}

/// Case-insensitive regex for a user-typed pattern; falls back to a literal
/// match when the pattern isn't valid regex.
pub fn search_regex(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Restore UI state from .state.json through the same resync path a
/// creation uses. Missing entities leave nothing selected.
pub fn restore_ui_state(app: &mut App) {
    let Some(ui_state) = read_ui_state(&app.workspace.qa_dir) else {
        return;
    };

    let filter = ui_state
        .filter
        .as_deref()
        .and_then(|f| f.parse::<Filter>().ok());
    app.selection.select_none();
    app.selection.resync(
        &app.workspace.store,
        Handoff {
            entity_id: ui_state.selected,
            filter,
        },
    );
    app.cursor = ui_state.cursor;
    app.clamp_cursor();
    app.last_search = ui_state.last_search;
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let ui_state = UiState {
        filter: Some(app.selection.filter().to_string()),
        selected: app.selection.active().map(str::to_string),
        cursor: app.cursor,
        last_search: app.last_search.clone(),
    };
    let _ = write_ui_state(&app.workspace.qa_dir, &ui_state);
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start: PathBuf = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let root = discover_workspace(&start)?;
    let workspace = load_workspace(&root)?;

    // The TUI still works without live reload
    let watcher = StoreWatcher::start(&workspace.qa_dir, &workspace.config.store.file).ok();

    let mut app = App::new(workspace);
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        if let Some(w) = watcher {
            app.handle_file_events(w.poll());
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
