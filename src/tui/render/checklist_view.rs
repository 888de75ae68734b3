use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::entity::{Category, Entity, Item};
use crate::ops::progress::Progress;
use crate::tui::app::{App, FlatRow, Mode};
use crate::util::unicode;

use super::helpers::{check_symbol, spans_width};

const BAR_WIDTH: usize = 20;

/// Render the overall progress row of the active entity
pub fn render_overall_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let Some(entity) = app.active_entity() else {
        frame.render_widget(Paragraph::new("").style(Style::default().bg(bg)), area);
        return;
    };

    let progress = Progress::overall(entity);
    let color = app.theme.progress_color(progress.percentage());
    let spans = vec![
        Span::styled(
            " Overall  ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(progress.detail(), Style::default().fg(color).bg(bg)),
        Span::styled("  ", Style::default().bg(bg)),
        Span::styled(progress.bar(BAR_WIDTH), Style::default().fg(color).bg(bg)),
    ];
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Render the three category checklists of the active entity
pub fn render_checklist(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;

    let Some(entity) = app.active_entity() else {
        let noun = app.workspace.config.entities.kind.noun();
        let message = if app.workspace.store.is_empty() {
            format!(" No {}s yet. Press n to create one.", noun)
        } else {
            format!(" No {} selected. Press Tab to pick one or n to create one.", noun)
        };
        let line = Line::from(Span::styled(message, Style::default().fg(app.theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    };

    let rows = app.flat_rows();
    let cursor = app.cursor.min(rows.len().saturating_sub(1));

    // Keep the cursor on screen
    let mut scroll = app.scroll_offset;
    if cursor < scroll {
        scroll = cursor;
    } else if height > 0 && cursor >= scroll + height {
        scroll = cursor + 1 - height;
    }

    let width = area.width as usize;
    let show_cursor = matches!(app.mode, Mode::Navigate | Mode::Edit);
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, row)| {
            let is_cursor = show_cursor && i == cursor;
            match *row {
                FlatRow::Header(category) => header_line(app, entity, category, is_cursor, width),
                FlatRow::Item(category, idx) => match entity.items(category).get(idx) {
                    Some(item) => item_line(app, item, idx, is_cursor, width),
                    None => Line::from(""),
                },
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
    app.scroll_offset = scroll;
}

/// `UI/UX  3 / 5 completed  60%  ████████░░░░`
fn header_line<'a>(
    app: &App,
    entity: &Entity,
    category: Category,
    is_cursor: bool,
    width: usize,
) -> Line<'a> {
    let row_bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let progress = Progress::of_category(entity, category);
    let pct = progress.percentage();
    let color = app.theme.progress_color(pct);

    let mut spans = vec![
        Span::styled(
            format!(" {:<14}", category.label()),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<18}", progress.summary()),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
        Span::styled(format!("{:>4}%  ", pct), Style::default().fg(color).bg(row_bg)),
        Span::styled(
            progress.bar(BAR_WIDTH),
            Style::default().fg(color).bg(row_bg),
        ),
    ];
    pad_to_width(&mut spans, width, row_bg);
    Line::from(spans)
}

/// `   [x]  2. Label` with a trailing delete hint on custom items
fn item_line<'a>(app: &App, item: &Item, idx: usize, is_cursor: bool, width: usize) -> Line<'a> {
    let row_bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let check_color = if item.checked {
        app.theme.green
    } else {
        app.theme.text
    };
    let label_style = if item.checked {
        Style::default()
            .fg(app.theme.dim)
            .bg(row_bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(app.theme.text).bg(row_bg)
    };

    let mut spans = vec![
        Span::styled("   ", Style::default().bg(row_bg)),
        Span::styled(
            check_symbol(item.checked),
            Style::default().fg(check_color).bg(row_bg),
        ),
        Span::styled(
            format!(" {:>2}. ", idx + 1),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
    ];

    let hint = if !item.is_predefined && is_cursor {
        "  x delete"
    } else if !item.is_predefined {
        "  *"
    } else {
        ""
    };
    let budget = width.saturating_sub(spans_width(&spans) + unicode::display_width(hint));
    spans.push(Span::styled(
        unicode::truncate_to_width(&item.label, budget),
        label_style,
    ));
    if !hint.is_empty() {
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(row_bg),
        ));
    }
    pad_to_width(&mut spans, width, row_bg);
    Line::from(spans)
}

/// Fill the rest of the row so the selection background spans the width
fn pad_to_width(spans: &mut Vec<Span>, width: usize, bg: ratatui::style::Color) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
    }
}
