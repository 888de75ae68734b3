pub mod catalog;
pub mod config;
pub mod entity;
pub mod store;
pub mod workspace;

pub use catalog::*;
pub use config::*;
pub use entity::*;
pub use store::*;
pub use workspace::*;
