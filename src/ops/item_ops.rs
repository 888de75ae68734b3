use chrono::{DateTime, Utc};

use crate::model::entity::{Category, Entity, Item};
use crate::ops::entity_ops::unique_id;

/// Error type for item edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("please enter an item description")]
    EmptyLabel,
}

/// Result of asking to delete an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed(Item),
    /// Predefined items are never deleted
    Predefined,
    NotFound,
}

/// Flip an item's checked state. Returns false when the item isn't there.
pub fn toggle(entity: &mut Entity, category: Category, item_id: &str) -> bool {
    match entity
        .items_mut(category)
        .iter_mut()
        .find(|i| i.id == item_id)
    {
        Some(item) => {
            item.checked = !item.checked;
            true
        }
        None => false,
    }
}

/// Append a custom item to a category. Returns the new item's id.
pub fn add_custom(
    entity: &mut Entity,
    category: Category,
    label: &str,
    now: DateTime<Utc>,
) -> Result<String, ItemError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(ItemError::EmptyLabel);
    }

    let base = format!("custom_{}", now.timestamp_millis());
    let id = unique_id(&base, |candidate| {
        entity.categories.all_items().any(|i| i.id == candidate)
    });
    entity
        .items_mut(category)
        .push(Item::custom(id.clone(), label.to_string()));
    Ok(id)
}

/// Delete a custom item. Predefined and missing items leave the list alone.
pub fn delete_custom(entity: &mut Entity, category: Category, item_id: &str) -> DeleteOutcome {
    let items = entity.items_mut(category);
    let Some(idx) = items.iter().position(|i| i.id == item_id) else {
        return DeleteOutcome::NotFound;
    };
    if items[idx].is_predefined {
        return DeleteOutcome::Predefined;
    }
    DeleteOutcome::Removed(items.remove(idx))
}

/// Resolve an item reference: an exact id, or a 1-based position when the
/// reference is a number that isn't an id.
pub fn resolve_item<'a>(items: &'a [Item], reference: &str) -> Option<&'a Item> {
    let reference = reference.trim();
    if let Some(item) = items.iter().find(|i| i.id == reference) {
        return Some(item);
    }
    let pos: usize = reference.parse().ok()?;
    pos.checked_sub(1).and_then(|idx| items.get(idx))
}
