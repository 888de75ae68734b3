use serde::Serialize;

use crate::model::catalog::{self, CatalogEntry};
use crate::model::entity::{Category, Entity, Item};
use crate::ops::entity_ops::display_label;
use crate::ops::progress::Progress;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProgressJson {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

#[derive(Serialize)]
pub struct EntitySummaryJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,
    pub created: String,
    pub progress: ProgressJson,
}

#[derive(Serialize)]
pub struct ItemJson {
    pub position: usize,
    pub id: String,
    pub label: String,
    pub checked: bool,
    pub predefined: bool,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub key: &'static str,
    pub label: &'static str,
    pub progress: ProgressJson,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct EntityDetailJson {
    #[serde(flatten)]
    pub summary: EntitySummaryJson,
    pub categories: Vec<CategoryJson>,
}

#[derive(Serialize)]
pub struct CatalogEntryJson {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn progress_to_json(progress: Progress) -> ProgressJson {
    ProgressJson {
        completed: progress.completed,
        total: progress.total,
        percentage: progress.percentage(),
    }
}

pub fn entity_to_summary_json(entity: &Entity) -> EntitySummaryJson {
    EntitySummaryJson {
        id: entity.id.clone(),
        name: entity.name.clone(),
        catalog: entity.catalog_id.clone(),
        catalog_name: entity
            .catalog_id
            .as_deref()
            .and_then(catalog::entry_name)
            .map(str::to_string),
        created: entity.created.to_rfc3339(),
        progress: progress_to_json(Progress::overall(entity)),
    }
}

/// Per-category breakdown; `with_items` controls whether item lists are included
pub fn entity_to_detail_json(entity: &Entity, with_items: bool) -> EntityDetailJson {
    EntityDetailJson {
        summary: entity_to_summary_json(entity),
        categories: Category::ALL
            .into_iter()
            .map(|c| CategoryJson {
                key: c.key(),
                label: c.label(),
                progress: progress_to_json(Progress::of_category(entity, c)),
                items: if with_items {
                    entity
                        .items(c)
                        .iter()
                        .enumerate()
                        .map(|(i, item)| ItemJson {
                            position: i + 1,
                            id: item.id.clone(),
                            label: item.label.clone(),
                            checked: item.checked,
                            predefined: item.is_predefined,
                        })
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect(),
    }
}

pub fn catalog_entry_to_json(entry: &CatalogEntry) -> CatalogEntryJson {
    CatalogEntryJson {
        id: entry.id,
        name: entry.name,
        color: entry.display_color,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

const BAR_WIDTH: usize = 20;

/// One-line entity summary for `qa list`
pub fn format_entity_line(entity: &Entity) -> String {
    let progress = Progress::overall(entity);
    format!(
        "{}  {}  {:>4}  {}",
        entity.id,
        display_label(entity),
        format!("{}%", progress.percentage()),
        progress.bar(10)
    )
}

/// `[x] 3. Label *` with `*` marking custom items
pub fn format_item_line(position: usize, item: &Item) -> String {
    let mark = if item.checked { 'x' } else { ' ' };
    let custom = if item.is_predefined { "" } else { " *" };
    format!("  [{}] {:>2}. {}{}", mark, position, item.label, custom)
}

fn format_category_header(entity: &Entity, category: Category) -> String {
    let progress = Progress::of_category(entity, category);
    format!(
        "{}  {}  {}%",
        category.label(),
        progress.summary(),
        progress.percentage()
    )
}

fn format_overall(entity: &Entity) -> String {
    let progress = Progress::overall(entity);
    format!("Overall  {}  {}", progress.detail(), progress.bar(BAR_WIDTH))
}

/// Full checklist view for `qa show`
pub fn format_entity_detail(entity: &Entity) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", entity.id, display_label(entity)),
        format!("created: {}", entity.created.format("%Y-%m-%d %H:%M")),
        format_overall(entity),
    ];
    for category in Category::ALL {
        lines.push(String::new());
        lines.push(format_category_header(entity, category));
        for (i, item) in entity.items(category).iter().enumerate() {
            lines.push(format_item_line(i + 1, item));
        }
    }
    lines
}

/// Progress-only view for `qa progress`
pub fn format_entity_progress(entity: &Entity) -> Vec<String> {
    let mut lines = vec![display_label(entity)];
    for category in Category::ALL {
        let progress = Progress::of_category(entity, category);
        lines.push(format!(
            "  {:<14} {:>4}  {}  {}",
            category.label(),
            format!("{}%", progress.percentage()),
            progress.bar(BAR_WIDTH),
            progress.summary()
        ));
    }
    lines.push(format!("  {}", format_overall(entity)));
    lines
}

pub fn format_catalog_entry(entry: &CatalogEntry) -> String {
    format!("{:<14} {:<24} {}", entry.id, entry.name, entry.display_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Categories;
    use chrono::{TimeZone, Utc};

    fn entity() -> Entity {
        let mut categories = Categories::default();
        categories.uiux = vec![
            Item {
                id: "a".into(),
                label: "Fonts".into(),
                checked: true,
                is_predefined: true,
            },
            Item::custom("b".into(), "Hero video".into()),
        ];
        Entity {
            id: "task_1".into(),
            name: "Landing".into(),
            catalog_id: Some("wts".into()),
            created: Utc.timestamp_millis_opt(1_718_000_000_000).unwrap(),
            categories,
        }
    }

    #[test]
    fn item_line_marks_checked_and_custom() {
        let e = entity();
        assert_eq!(format_item_line(1, &e.categories.uiux[0]), "  [x]  1. Fonts");
        assert_eq!(
            format_item_line(2, &e.categories.uiux[1]),
            "  [ ]  2. Hero video *"
        );
    }

    #[test]
    fn detail_includes_category_headers() {
        let lines = format_entity_detail(&entity());
        assert!(lines[0].starts_with("task_1 Landing ("));
        assert!(lines.iter().any(|l| l == "UI/UX  1 / 2 completed  50%"));
        assert!(lines.iter().any(|l| l == "Responsive  0 / 0 completed  0%"));
        assert!(lines[2].starts_with("Overall  50% (1/2 items)"));
    }

    #[test]
    fn detail_json_omits_items_when_asked() {
        let json = serde_json::to_value(entity_to_detail_json(&entity(), false)).unwrap();
        assert_eq!(json["id"], "task_1");
        assert_eq!(json["progress"]["percentage"], 50);
        assert!(json["categories"][0].get("items").is_none());

        let json = serde_json::to_value(entity_to_detail_json(&entity(), true)).unwrap();
        assert_eq!(json["categories"][0]["items"][1]["predefined"], false);
        assert_eq!(json["categories"][0]["items"][1]["position"], 2);
    }
}
