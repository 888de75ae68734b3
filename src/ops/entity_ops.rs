use chrono::{DateTime, Utc};

use crate::model::catalog::{self, Template};
use crate::model::config::EntityConfig;
use crate::model::entity::{Categories, Category, Entity, EntityKind, Item};
use crate::model::store::Store;
use crate::ops::selection::Selection;

/// Error type for entity lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("please enter a {0} name")]
    EmptyName(&'static str),
    #[error("please select a project")]
    MissingCatalog,
    #[error("unknown project: {0}")]
    UnknownCatalog(String),
    #[error("{0} not found")]
    NotFound(String),
}

/// What the user asked for in the creation dialog
#[derive(Debug, Clone, Copy)]
pub struct NewEntity<'a> {
    pub name: &'a str,
    pub catalog_id: Option<&'a str>,
}

/// Workspace-level choices that shape a new entity
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions {
    pub kind: EntityKind,
    pub require_catalog: bool,
    pub template: Template,
}

impl From<&EntityConfig> for CreateOptions {
    fn from(config: &EntityConfig) -> Self {
        CreateOptions {
            kind: config.kind,
            require_catalog: config.require_catalog,
            template: config.template,
        }
    }
}

/// Create an entity seeded from the template set and insert it into the
/// store. Returns the new id. Nothing is inserted when validation fails.
pub fn create_entity(
    store: &mut Store,
    request: NewEntity<'_>,
    options: CreateOptions,
    now: DateTime<Utc>,
) -> Result<String, EntityError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(EntityError::EmptyName(options.kind.noun()));
    }

    let catalog_id = request
        .catalog_id
        .map(str::trim)
        .filter(|id| !id.is_empty());
    match catalog_id {
        None if options.require_catalog => return Err(EntityError::MissingCatalog),
        Some(id) if catalog::find_entry(id).is_none() => {
            return Err(EntityError::UnknownCatalog(id.to_string()));
        }
        _ => {}
    }

    let base = format!("{}_{}", options.kind.id_prefix(), now.timestamp_millis());
    let id = unique_id(&base, |candidate| store.contains(candidate));

    store.upsert(Entity {
        id: id.clone(),
        name: name.to_string(),
        catalog_id: catalog_id.map(str::to_string),
        created: now,
        categories: seed_categories(options.template, catalog_id, now),
    });
    Ok(id)
}

/// Build the three predefined item lists: general labels followed by the
/// catalog entry's extras, all unchecked.
pub fn seed_categories(
    template: Template,
    catalog_id: Option<&str>,
    now: DateTime<Utc>,
) -> Categories {
    let set = template.set();
    let millis = now.timestamp_millis();
    let mut categories = Categories::default();
    for category in Category::ALL {
        let items = set
            .combined_labels(category, catalog_id)
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                Item::predefined(
                    format!("item_{}_{}_{}", millis, category.key(), index),
                    label.to_string(),
                )
            })
            .collect();
        *categories.get_mut(category) = items;
    }
    categories
}

/// Remove an entity wholesale. Clears the selection if it pointed at it.
/// Confirmation is the caller's job.
pub fn delete_entity(
    store: &mut Store,
    selection: &mut Selection,
    id: &str,
) -> Result<Entity, EntityError> {
    let removed = store
        .remove(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    selection.forget(id);
    Ok(removed)
}

/// `base`, or `base_<n>` for the smallest n ≥ 2 not already taken
pub fn unique_id(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Display label for an entity in selectors: `name (catalog name)`
pub fn display_label(entity: &Entity) -> String {
    match entity.catalog_id.as_deref() {
        Some(id) => format!(
            "{} ({})",
            entity.name,
            catalog::entry_name(id).unwrap_or("Unknown Project")
        ),
        None => entity.name.clone(),
    }
}
