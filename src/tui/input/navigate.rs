use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::catalog::CATALOG;
use crate::ops::entity_ops::display_label;
use crate::ops::selection::Filter;
use crate::tui::app::{App, ConfirmAction, ConfirmState, Mode, NewEntityDialog};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Quit
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Cursor
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.flat_rows().len().saturating_sub(1);
        }

        // Items
        (_, KeyCode::Char(' ')) | (_, KeyCode::Enter) => app.toggle_cursor_item(),
        (_, KeyCode::Char('a')) => app.start_add_item(),
        (_, KeyCode::Char('x')) => app.delete_cursor_item(),

        // Entities
        (_, KeyCode::Tab) => app.step_entity(true),
        (_, KeyCode::BackTab) => app.step_entity(false),
        (_, KeyCode::Char('n')) => open_new_entity_dialog(app),
        (_, KeyCode::Char('D')) => confirm_delete_entity(app),

        // Filter
        (_, KeyCode::Char('f')) => app.cycle_filter(true),
        (_, KeyCode::Char('F')) => app.cycle_filter(false),

        // Search
        (_, KeyCode::Char('/')) => {
            app.edit_buffer.clear();
            app.edit_cursor = 0;
            app.mode = Mode::Search;
        }
        (_, KeyCode::Esc) => app.last_search = None,

        _ => {}
    }
}

fn open_new_entity_dialog(app: &mut App) {
    // Preselect the catalog entry being filtered on, else the first one
    // when a catalog entry is required
    let catalog_index = match app.selection.filter() {
        Filter::Catalog(id) => CATALOG.iter().position(|e| e.id == id),
        Filter::All if app.workspace.config.entities.require_catalog => Some(0),
        Filter::All => None,
    };
    app.dialog = Some(NewEntityDialog {
        catalog_index,
        ..Default::default()
    });
    app.mode = Mode::Dialog;
}

fn confirm_delete_entity(app: &mut App) {
    let Some(entity) = app.active_entity() else {
        return;
    };
    let noun = app.workspace.config.entities.kind.noun();
    let state = ConfirmState {
        message: format!(
            "Delete {} \"{}\" and all its items?",
            noun,
            display_label(entity)
        ),
        action: ConfirmAction::DeleteEntity {
            id: entity.id.clone(),
        },
    };
    app.confirm_state = Some(state);
    app.mode = Mode::Confirm;
}
