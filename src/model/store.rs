use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// In-memory mapping from entity id to entity, in creation order.
/// Serializes to a single JSON object keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    entities: IndexMap<String, Entity>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Insert or replace an entity under its own id
    pub fn upsert(&mut self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Remove an entity, keeping the order of the rest
    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        self.entities.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
