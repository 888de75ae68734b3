use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode, StatusKind};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Apply a line-editing key to `buffer`. Returns false if the key isn't an
/// editing key, so callers can handle it themselves.
pub(super) fn edit_line(buffer: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('a')) | (_, KeyCode::Home) => *cursor = 0,
        (KeyModifiers::CONTROL, KeyCode::Char('e')) | (_, KeyCode::End) => {
            *cursor = buffer.len();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            buffer.drain(..*cursor);
            *cursor = 0;
        }
        (_, KeyCode::Backspace) => {
            if let Some(prev) = prev_grapheme_boundary(buffer, *cursor) {
                buffer.drain(prev..*cursor);
                *cursor = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(next) = next_grapheme_boundary(buffer, *cursor) {
                buffer.drain(*cursor..next);
            }
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = prev_grapheme_boundary(buffer, *cursor) {
                *cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = next_grapheme_boundary(buffer, *cursor) {
                *cursor = next;
            }
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => return false,
    }
    true
}

/// Typing a custom item label
pub(super) fn handle_add_item(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.edit_buffer.clear();
            app.edit_category = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let Some(category) = app.edit_category else {
                app.mode = Mode::Navigate;
                return;
            };
            let label = app.edit_buffer.clone();
            // On a validation error stay in Edit so the text can be fixed
            if app.add_custom_item(category, &label) {
                app.edit_buffer.clear();
                app.edit_category = None;
                app.mode = Mode::Navigate;
            }
        }
        _ => {
            edit_line(&mut app.edit_buffer, &mut app.edit_cursor, key);
        }
    }
}

/// Typing an entity name search
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.edit_buffer.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            // Empty input repeats the last search
            let pattern = if app.edit_buffer.is_empty() {
                app.last_search.clone()
            } else {
                Some(app.edit_buffer.clone())
            };
            app.edit_buffer.clear();
            app.mode = Mode::Navigate;
            if let Some(pattern) = pattern {
                if !app.search_entities(&pattern, true) {
                    app.set_status(StatusKind::Info, format!("no match for /{}", pattern));
                }
                app.last_search = Some(pattern);
            }
        }
        _ => {
            edit_line(&mut app.edit_buffer, &mut app.edit_cursor, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn edit_line_inserts_and_deletes_graphemes() {
        let mut buf = String::new();
        let mut cur = 0;
        for c in "cafe\u{301}!".chars() {
            edit_line(&mut buf, &mut cur, key(KeyCode::Char(c)));
        }
        assert_eq!(buf, "cafe\u{301}!");
        edit_line(&mut buf, &mut cur, key(KeyCode::Left));
        edit_line(&mut buf, &mut cur, key(KeyCode::Backspace));
        // The combining accent goes with its base letter
        assert_eq!(buf, "caf!");
    }

    #[test]
    fn edit_line_ctrl_u_clears_to_start() {
        let mut buf = "hello world".to_string();
        let mut cur = 6;
        edit_line(
            &mut buf,
            &mut cur,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(buf, "world");
        assert_eq!(cur, 0);
    }

    #[test]
    fn edit_line_ignores_unrelated_keys() {
        let mut buf = String::new();
        let mut cur = 0;
        assert!(!edit_line(&mut buf, &mut cur, key(KeyCode::Tab)));
    }
}
