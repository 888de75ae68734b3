use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::edit::edit_line;

/// New-entity dialog: the name field takes text, ←/→ pick the catalog entry
pub(super) fn handle_dialog(app: &mut App, key: KeyEvent) {
    let allow_none = !app.workspace.config.entities.require_catalog;
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.dialog = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Left => dialog.cycle_catalog(false, allow_none),
        KeyCode::Right => dialog.cycle_catalog(true, allow_none),
        KeyCode::Enter => {
            let dialog = dialog.clone();
            // Validation errors keep the dialog open
            if app.create_entity(&dialog) {
                app.dialog = None;
                app.mode = Mode::Navigate;
            }
        }
        _ => {
            edit_line(&mut dialog.name, &mut dialog.cursor, key);
        }
    }
}
