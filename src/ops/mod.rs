pub mod entity_ops;
pub mod item_ops;
pub mod progress;
pub mod selection;
