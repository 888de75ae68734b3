use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::config::WorkspaceConfig;
use crate::model::entity::{Categories, Entity, Item};
use crate::model::store::Store;
use crate::model::workspace::Workspace;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An entity with two UI/UX items, one functionality item and no
/// responsive items, all predefined and unchecked.
pub fn sample_entity(id: &str, name: &str, catalog_id: Option<&str>) -> Entity {
    Entity {
        id: id.to_string(),
        name: name.to_string(),
        catalog_id: catalog_id.map(str::to_string),
        created: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        categories: Categories {
            uiux: vec![
                Item::predefined("uiux_0".into(), "Layout matches design".into()),
                Item::predefined("uiux_1".into(), "Fonts and colors".into()),
            ],
            functionality: vec![Item::predefined(
                "functionality_0".into(),
                "Forms submit".into(),
            )],
            responsive: vec![],
        },
    }
}

/// An app over an in-memory workspace whose directory doesn't exist, so
/// saves fail with a warning instead of touching disk.
pub fn app_with_entities(entities: Vec<Entity>) -> App {
    let mut store = Store::new();
    for entity in entities {
        store.upsert(entity);
    }
    let workspace = Workspace {
        root: PathBuf::from("/nonexistent/qa-test"),
        qa_dir: PathBuf::from("/nonexistent/qa-test/qa"),
        config: WorkspaceConfig::default(),
        store,
    };
    App::new(workspace)
}
