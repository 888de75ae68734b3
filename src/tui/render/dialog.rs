use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::catalog::CATALOG;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

/// Render the new-entity popup: a name field and a catalog chooser
pub fn render_new_entity_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = app.dialog.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let noun = app.workspace.config.entities.kind.noun();
    let popup = centered_rect_fixed(56, 8, area);
    frame.render_widget(Clear, popup);

    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);

    // Name field with a block cursor at the edit position
    let (before, after) = dialog.name.split_at(dialog.cursor.min(dialog.name.len()));
    let name_line = Line::from(vec![
        Span::styled(" Name     ", label_style),
        Span::styled(before.to_string(), text_style),
        Span::styled("\u{258C}", cursor_style),
        Span::styled(after.to_string(), text_style),
    ]);

    let (catalog_label, catalog_color) = match dialog.catalog_id() {
        Some(id) => (
            CATALOG
                .iter()
                .find(|e| e.id == id)
                .map_or(id, |e| e.name)
                .to_string(),
            app.theme.catalog_color(Some(id)),
        ),
        None if app.workspace.config.entities.require_catalog => {
            ("select a project".to_string(), app.theme.dim)
        }
        None => ("none".to_string(), app.theme.dim),
    };
    let catalog_line = Line::from(vec![
        Span::styled(" Project  ", label_style),
        Span::styled("\u{25C0} ", cursor_style),
        Span::styled(
            catalog_label,
            Style::default()
                .fg(catalog_color)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{25B6}", cursor_style),
    ]);

    let lines = vec![
        Line::from(""),
        name_line,
        Line::from(""),
        catalog_line,
        Line::from(""),
        Line::from(Span::styled(
            " Enter create  \u{2190}\u{2192} project  Esc cancel",
            label_style,
        )),
    ];

    let title = format!(" New {} ", noun);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, text_style.add_modifier(Modifier::BOLD)))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Render the y/n confirmation popup
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(state) = app.confirm_state.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let width = (unicode::display_width(&state.message) as u16 + 4).clamp(30, 70);
    let popup = centered_rect_fixed(width, 5, area);
    frame.render_widget(Clear, popup);

    let inner_width = popup.width.saturating_sub(4) as usize;
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(&state.message, inner_width)),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " y",
                Style::default()
                    .fg(app.theme.red)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" delete   ", Style::default().fg(app.theme.text).bg(bg)),
            Span::styled(
                "n",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" cancel", Style::default().fg(app.theme.text).bg(bg)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{ConfirmAction, ConfirmState, Mode, NewEntityDialog};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn dialog_shows_name_and_catalog() {
        let mut app = app_with_entities(vec![]);
        app.mode = Mode::Dialog;
        app.dialog = Some(NewEntityDialog {
            name: "Checkout".into(),
            cursor: 8,
            catalog_index: CATALOG.iter().position(|e| e.id == "caritas"),
        });
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_new_entity_dialog(frame, &app, area);
        });
        assert!(output.contains("New task"));
        assert!(output.contains("Checkout\u{258C}"));
        assert!(output.contains("\u{25C0} Caritas \u{25B6}"));
    }

    #[test]
    fn dialog_prompts_for_required_catalog() {
        let mut app = app_with_entities(vec![]);
        app.dialog = Some(NewEntityDialog::default());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_new_entity_dialog(frame, &app, area);
        });
        assert!(output.contains("select a project"));
    }

    #[test]
    fn confirm_popup_shows_message() {
        let mut app = app_with_entities(vec![]);
        app.confirm_state = Some(ConfirmState {
            message: "Delete task \"Home\" and all its items?".into(),
            action: ConfirmAction::DeleteEntity {
                id: "task_1".into(),
            },
        });
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_confirm_popup(frame, &app, area);
        });
        assert!(output.contains("Delete task \"Home\" and all its items?"));
        assert!(output.contains("y delete"));
    }
}
