use std::fmt;
use std::str::FromStr;

use crate::model::catalog;
use crate::model::entity::Entity;
use crate::model::store::Store;

/// Restricts which entities populate the selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Catalog(String),
}

impl Filter {
    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            Filter::All => true,
            Filter::Catalog(id) => entity.catalog_id.as_deref() == Some(id.as_str()),
        }
    }

    /// Label shown in the filter indicator
    pub fn label(&self) -> &str {
        match self {
            Filter::All => "All Projects",
            Filter::Catalog(id) => catalog::entry_name(id).unwrap_or(id.as_str()),
        }
    }

    /// Step through All and every catalog entry, wrapping around
    pub fn cycle(&self, forward: bool) -> Filter {
        let mut options: Vec<Filter> = vec![Filter::All];
        options.extend(
            catalog::CATALOG
                .iter()
                .map(|e| Filter::Catalog(e.id.to_string())),
        );
        let current = options.iter().position(|f| f == self).unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        options.swap_remove(next)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Catalog(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Filter::All),
            id if catalog::find_entry(id).is_some() => Ok(Filter::Catalog(id.to_string())),
            other => Err(format!("unknown project filter: {}", other)),
        }
    }
}

/// Selection context carried across an entity creation (or a restart):
/// the entity to select and the filter to show it under. Consumed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handoff {
    pub entity_id: Option<String>,
    pub filter: Option<Filter>,
}

impl Handoff {
    /// Handoff that selects a freshly created entity under its own catalog
    pub fn for_created(entity: &Entity) -> Self {
        Handoff {
            entity_id: Some(entity.id.clone()),
            filter: entity.catalog_id.clone().map(Filter::Catalog),
        }
    }
}

/// The active filter and at most one active entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<String>,
    filter: Filter,
}

impl Selection {
    pub fn new(filter: Filter) -> Self {
        Selection {
            active: None,
            filter,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Change the filter; always clears the active entity
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.active = None;
    }

    /// Select an entity if it exists and is visible under the filter.
    /// Returns whether the selection changed to it.
    pub fn select(&mut self, store: &Store, id: &str) -> bool {
        match store.get(id) {
            Some(entity) if self.filter.matches(entity) => {
                self.active = Some(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn select_none(&mut self) {
        self.active = None;
    }

    /// Drop the active entity if it is `id`
    pub fn forget(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    /// Entities passing the filter, in store order
    pub fn visible<'a>(&self, store: &'a Store) -> Vec<&'a Entity> {
        store.iter().filter(|e| self.filter.matches(e)).collect()
    }

    /// The active entity, if it is still in the store
    pub fn active_entity<'a>(&self, store: &'a Store) -> Option<&'a Entity> {
        self.active.as_deref().and_then(|id| store.get(id))
    }

    /// Move the active entity by `delta` within the visible list, wrapping.
    /// With nothing selected, forward picks the first and backward the last.
    pub fn step(&mut self, store: &Store, forward: bool) {
        let visible = self.visible(store);
        if visible.is_empty() {
            self.active = None;
            return;
        }
        let len = visible.len();
        let current = self
            .active
            .as_deref()
            .and_then(|id| visible.iter().position(|e| e.id == id));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.active = Some(visible[next].id.clone());
    }

    /// Re-synchronize after the store changed underneath: apply the handoff
    /// (filter first, then entity), and drop a selection that no longer
    /// resolves.
    pub fn resync(&mut self, store: &Store, handoff: Handoff) {
        if let Some(filter) = handoff.filter {
            self.set_filter(filter);
        }
        if let Some(id) = handoff.entity_id
            && let Some(entity) = store.get(&id)
        {
            if !self.filter.matches(entity) {
                self.set_filter(Filter::All);
            }
            self.active = Some(id);
        }
        if self.active_entity(store).is_none() {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Categories;
    use chrono::Utc;

    fn entity(id: &str, catalog_id: Option<&str>) -> Entity {
        Entity {
            id: id.to_string(),
            name: id.to_uppercase(),
            catalog_id: catalog_id.map(str::to_string),
            created: Utc::now(),
            categories: Categories::default(),
        }
    }

    fn sample_store() -> Store {
        let mut store = Store::new();
        store.upsert(entity("a", Some("wts")));
        store.upsert(entity("b", Some("caritas")));
        store.upsert(entity("c", Some("wts")));
        store.upsert(entity("d", None));
        store
    }

    fn ids<'a>(entities: &[&'a Entity]) -> Vec<&'a str> {
        entities.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn filter_parse() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!(
            "metrohm".parse::<Filter>().unwrap(),
            Filter::Catalog("metrohm".into())
        );
        assert!("acme".parse::<Filter>().is_err());
    }

    #[test]
    fn visible_respects_filter() {
        let store = sample_store();
        let mut sel = Selection::default();
        assert_eq!(ids(&sel.visible(&store)), vec!["a", "b", "c", "d"]);
        sel.set_filter(Filter::Catalog("wts".into()));
        assert_eq!(ids(&sel.visible(&store)), vec!["a", "c"]);
    }

    #[test]
    fn changing_filter_clears_selection() {
        let store = sample_store();
        let mut sel = Selection::default();
        assert!(sel.select(&store, "a"));
        sel.set_filter(Filter::Catalog("wts".into()));
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn select_rejects_missing_or_filtered_out() {
        let store = sample_store();
        let mut sel = Selection::new(Filter::Catalog("wts".into()));
        assert!(!sel.select(&store, "zzz"));
        assert!(!sel.select(&store, "b"));
        assert_eq!(sel.active(), None);
        assert!(sel.select(&store, "c"));
        assert_eq!(sel.active_entity(&store).unwrap().name, "C");
    }

    #[test]
    fn forget_only_clears_matching() {
        let store = sample_store();
        let mut sel = Selection::default();
        sel.select(&store, "a");
        sel.forget("b");
        assert_eq!(sel.active(), Some("a"));
        sel.forget("a");
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn step_wraps_within_visible() {
        let store = sample_store();
        let mut sel = Selection::new(Filter::Catalog("wts".into()));
        sel.step(&store, true);
        assert_eq!(sel.active(), Some("a"));
        sel.step(&store, true);
        assert_eq!(sel.active(), Some("c"));
        sel.step(&store, true);
        assert_eq!(sel.active(), Some("a"));
        sel.step(&store, false);
        assert_eq!(sel.active(), Some("c"));
    }

    #[test]
    fn step_on_empty_store_clears() {
        let mut sel = Selection::default();
        sel.step(&Store::new(), true);
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn resync_applies_filter_then_entity() {
        let store = sample_store();
        let mut sel = Selection::default();
        sel.resync(
            &store,
            Handoff {
                entity_id: Some("b".into()),
                filter: Some(Filter::Catalog("caritas".into())),
            },
        );
        assert_eq!(sel.filter(), &Filter::Catalog("caritas".into()));
        assert_eq!(sel.active(), Some("b"));
    }

    #[test]
    fn resync_for_created_uses_entity_catalog() {
        let store = sample_store();
        let mut sel = Selection::default();
        sel.resync(&store, Handoff::for_created(store.get("c").unwrap()));
        assert_eq!(sel.filter(), &Filter::Catalog("wts".into()));
        assert_eq!(sel.active(), Some("c"));
    }

    #[test]
    fn resync_widens_filter_for_hidden_entity() {
        let store = sample_store();
        let mut sel = Selection::new(Filter::Catalog("wts".into()));
        sel.resync(
            &store,
            Handoff {
                entity_id: Some("d".into()),
                filter: None,
            },
        );
        assert_eq!(sel.filter(), &Filter::All);
        assert_eq!(sel.active(), Some("d"));
    }

    #[test]
    fn resync_ignores_missing_entity() {
        let store = sample_store();
        let mut sel = Selection::default();
        sel.resync(
            &store,
            Handoff {
                entity_id: Some("gone".into()),
                filter: Some(Filter::Catalog("wts".into())),
            },
        );
        assert_eq!(sel.filter(), &Filter::Catalog("wts".into()));
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn resync_drops_selection_removed_on_disk() {
        let mut store = sample_store();
        let mut sel = Selection::default();
        sel.select(&store, "a");
        store.remove("a");
        sel.resync(&store, Handoff::default());
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn filter_cycle_wraps() {
        let last = catalog::CATALOG.last().unwrap().id;
        assert_eq!(Filter::All.cycle(true), Filter::Catalog("wts".into()));
        assert_eq!(Filter::All.cycle(false), Filter::Catalog(last.into()));
        assert_eq!(Filter::Catalog(last.into()).cycle(true), Filter::All);
    }
}
