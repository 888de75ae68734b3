use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, StatusKind};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Edit => {
            let category = app.edit_category.map_or("", |c| c.label());
            let (before, after) = split_at_cursor(&app.edit_buffer, app.edit_cursor);
            (
                vec![
                    Span::styled(
                        format!("Add to {}: ", category),
                        Style::default().fg(app.theme.dim).bg(bg),
                    ),
                    Span::styled(before.to_string(), text_style),
                    Span::styled("\u{258C}", cursor_style),
                    Span::styled(after.to_string(), text_style),
                ],
                "Enter add  Esc cancel",
            )
        }
        Mode::Search => {
            let (before, after) = split_at_cursor(&app.edit_buffer, app.edit_cursor);
            (
                vec![
                    Span::styled(format!("/{}", before), text_style),
                    Span::styled("\u{258C}", cursor_style),
                    Span::styled(after.to_string(), text_style),
                ],
                "Enter search  Esc cancel",
            )
        }
        Mode::Confirm => (Vec::new(), "y confirm  n cancel"),
        Mode::Dialog => (Vec::new(), ""),
        Mode::Navigate => {
            let spans = match &app.last_search {
                Some(pattern) => vec![Span::styled(
                    format!("/{}", pattern),
                    Style::default().fg(app.theme.dim).bg(bg),
                )],
                None => Vec::new(),
            };
            let hint = if app.workspace.config.ui.show_key_hints {
                "space toggle  a add  n new  f filter  ? help"
            } else {
                ""
            };
            (spans, hint)
        }
    };

    // Text prompts keep their input and show the message after it;
    // elsewhere the message replaces the left side
    if let Some(message) = &app.status_message {
        let color = match message.kind {
            StatusKind::Info => app.theme.text,
            StatusKind::Warning => app.theme.yellow,
            StatusKind::Error => app.theme.red,
        };
        let span = Span::styled(message.text.clone(), Style::default().fg(color).bg(bg));
        if matches!(app.mode, Mode::Edit | Mode::Search) {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
            spans.push(span);
        } else {
            spans = vec![span];
        }
    }

    let content_width = spans_width(&spans);
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn split_at_cursor(buffer: &str, cursor: usize) -> (&str, &str) {
    let mut at = cursor.min(buffer.len());
    while !buffer.is_char_boundary(at) {
        at -= 1;
    }
    buffer.split_at(at)
}
