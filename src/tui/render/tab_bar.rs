use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::entity_ops::display_label;
use crate::ops::selection::Filter;
use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::spans_width;
use super::push_highlighted_spans;

/// Render the filter indicator and entity tabs, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    // Filter indicator: ▶ plus the filter label in its catalog color
    let filter = app.selection.filter();
    let filter_color = match filter {
        Filter::All => app.theme.text_bright,
        Filter::Catalog(id) => app.theme.catalog_color(Some(id.as_str())),
    };
    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(
        format!(" {} ", filter.label()),
        Style::default()
            .fg(filter_color)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    sep_cols.push(spans_width(&spans));
    spans.push(sep.clone());

    let visible = app.visible_entities();
    if visible.is_empty() {
        let noun = app.workspace.config.entities.kind.noun();
        spans.push(Span::styled(
            format!(" no {}s ", noun),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let active = app.selection.active();
    let search_re = app.active_search_re();
    for entity in visible {
        let is_current = active == Some(entity.id.as_str());
        let label = format!(" {} ", display_label(entity));
        let remaining = width.saturating_sub(spans_width(&spans) + 1);
        if remaining < 4 {
            spans.push(Span::styled(
                "\u{2026}",
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            break;
        }
        let label = unicode::truncate_to_width(&label, remaining);
        let style = tab_style(app, is_current);
        let match_style = style.fg(app.theme.yellow).add_modifier(Modifier::UNDERLINED);
        push_highlighted_spans(&mut spans, &label, style, match_style, search_re.as_ref());
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    let tabs = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let line: String = (0..width)
        .map(|col| {
            if sep_cols.contains(&col) {
                '\u{2534}'
            } else {
                '\u{2500}'
            }
        })
        .collect();
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn tabs_show_filter_and_entities() {
        let app = app_with_entities(vec![
            sample_entity("task_1", "Home", Some("wts")),
            sample_entity("task_2", "Cart", Some("caritas")),
        ]);
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        let first = output.lines().next().unwrap();
        assert!(first.contains("\u{25B6} All Projects"));
        assert!(first.contains("Home (WTS)"));
        assert!(first.contains("Cart (Caritas)"));
        assert!(output.contains('\u{2534}'));
    }

    #[test]
    fn catalog_filter_hides_other_entities() {
        let mut app = app_with_entities(vec![
            sample_entity("task_1", "Home", Some("wts")),
            sample_entity("task_2", "Cart", Some("caritas")),
        ]);
        app.set_filter(Filter::Catalog("caritas".into()));
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(output.contains("Caritas"));
        assert!(!output.contains("Home"));
    }

    #[test]
    fn search_match_keeps_tab_text_intact() {
        let mut app = app_with_entities(vec![
            sample_entity("task_1", "Home", Some("wts")),
            sample_entity("task_2", "Cart", Some("caritas")),
        ]);
        app.last_search = Some("car".into());
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(output.contains("Cart (Caritas)"));
        assert!(output.contains("Home (WTS)"));
    }

    #[test]
    fn empty_store_says_so() {
        let app = app_with_entities(vec![]);
        let output = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(output.contains("no tasks"));
    }
}
