pub mod checklist_view;
pub mod dialog;
pub mod help_overlay;
pub mod helpers;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, Mode};

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | overall progress (1) | checklist | status row (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    checklist_view::render_overall_row(frame, app, chunks[1]);
    checklist_view::render_checklist(frame, app, chunks[2]);

    if app.mode == Mode::Dialog {
        dialog::render_new_entity_dialog(frame, app, frame.area());
    }
    if app.mode == Mode::Confirm {
        dialog::render_confirm_popup(frame, app, frame.area());
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[3]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        if m.end() > m.start() {
            spans.push(Span::styled(
                text[m.start()..m.end()].to_string(),
                highlight_style,
            ));
        }
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_helpers::{TERM_H, TERM_W, app_with_entities, render_to_string, sample_entity};

    fn render_app(app: &mut App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, _area| render(frame, app))
    }

    #[test]
    fn full_screen_shows_all_regions() {
        let mut app = app_with_entities(vec![sample_entity("task_1", "Home", Some("wts"))]);
        let output = render_app(&mut app);
        assert!(output.contains("All Projects"));
        assert!(output.contains("Home (WTS)"));
        assert!(output.contains("Overall"));
        assert!(output.contains("UI/UX"));
        assert!(output.contains("Responsive"));
    }

    #[test]
    fn help_overlay_is_drawn_on_top() {
        let mut app = app_with_entities(vec![sample_entity("task_1", "Home", Some("wts"))]);
        app.show_help = true;
        let output = render_app(&mut app);
        assert!(output.contains("Key Bindings"));
    }

    #[test]
    fn highlighted_spans_split_on_matches() {
        let re = Regex::new("(?i)home").unwrap();
        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            "My Home page",
            Style::default(),
            Style::default(),
            Some(&re),
        );
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["My ", "Home", " page"]);
    }
}
