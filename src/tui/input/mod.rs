mod confirm;
mod dialog;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use dialog::handle_dialog;
use edit::{handle_add_item, handle_search};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_message = None;

    // Help overlay: any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_add_item(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Dialog => handle_dialog(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Terminals report Shift+d as either 'D' or 'd' with SHIFT; make it 'D'.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Category;
    use crate::ops::selection::Filter;
    use crate::tui::app::StatusKind;
    use crate::tui::render::test_helpers::{app_with_entities, sample_entity};

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn two_entities() -> App {
        app_with_entities(vec![
            sample_entity("task_1", "Home", Some("wts")),
            sample_entity("task_2", "Cart", Some("caritas")),
        ])
    }

    #[test]
    fn j_k_move_and_space_toggles() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.active_entity().unwrap().items(Category::Uiux)[0].checked);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn add_item_flow() {
        let mut app = two_entities();
        // Move into Functionality
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('j'));
        }
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit_category, Some(Category::Functionality));
        type_str(&mut app, "Export CSV");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        let items = app.active_entity().unwrap().items(Category::Functionality);
        assert_eq!(items.last().unwrap().label, "Export CSV");
        assert!(!items.last().unwrap().is_predefined);
    }

    #[test]
    fn add_blank_item_stays_in_edit_with_error() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(
            app.status_message.as_ref().map(|s| s.kind),
            Some(StatusKind::Error)
        );
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn x_deletes_custom_item_only() {
        let mut app = two_entities();
        app.add_custom_item(Category::Uiux, "Extra");
        let before = app.active_entity().unwrap().items(Category::Uiux).len();
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(
            app.active_entity().unwrap().items(Category::Uiux).len(),
            before - 1
        );
        // Cursor has moved off the removed item
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(
            app.active_entity().unwrap().items(Category::Uiux).len(),
            before - 1
        );
    }

    #[test]
    fn tab_switches_entity_and_f_switches_filter() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selection.active(), Some("task_2"));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.selection.active(), Some("task_1"));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.selection.filter(), &Filter::Catalog("wts".into()));
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('f'), KeyModifiers::SHIFT),
        );
        assert_eq!(app.selection.filter(), &Filter::All);
    }

    #[test]
    fn delete_entity_requires_confirmation() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('D'));
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.workspace.store.len(), 2);

        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.workspace.store.len(), 1);
        assert!(app.workspace.store.get("task_1").is_none());
    }

    #[test]
    fn new_entity_dialog_flow() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Dialog);
        // First catalog entry is preselected when one is required
        type_str(&mut app, "Checkout");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        let active = app.active_entity().unwrap();
        assert_eq!(active.name, "Checkout");
        assert_eq!(active.catalog_id.as_deref(), Some("wts"));
        assert_eq!(app.selection.filter(), &Filter::Catalog("wts".into()));
    }

    #[test]
    fn new_entity_dialog_cycles_from_preselected_catalog() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Program");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        let active = app.active_entity().unwrap();
        assert_eq!(active.catalog_id.as_deref(), Some("hoerzu/tvdigital"));
    }

    #[test]
    fn new_entity_dialog_starts_without_catalog_when_optional() {
        let mut app = two_entities();
        app.workspace.config.entities.require_catalog = false;
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.dialog.as_ref().and_then(|d| d.catalog_index), None);
    }

    #[test]
    fn new_entity_dialog_rejects_missing_name() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Dialog);
        assert_eq!(
            app.status_message.as_ref().map(|s| s.text.as_str()),
            Some("please enter a task name")
        );
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.workspace.store.len(), 2);
    }

    #[test]
    fn search_selects_matching_entity() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "car");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selection.active(), Some("task_2"));
        assert_eq!(app.last_search.as_deref(), Some("car"));
    }

    #[test]
    fn help_overlay_swallows_next_key() {
        let mut app = two_entities();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
