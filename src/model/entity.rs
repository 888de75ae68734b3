use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three fixed checklist groupings every entity carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Uiux,
    Functionality,
    Responsive,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [
        Category::Uiux,
        Category::Functionality,
        Category::Responsive,
    ];

    /// The key used in the stored JSON and on the command line
    pub fn key(self) -> &'static str {
        match self {
            Category::Uiux => "uiux",
            Category::Functionality => "functionality",
            Category::Responsive => "responsive",
        }
    }

    /// Human-readable panel title
    pub fn label(self) -> &'static str {
        match self {
            Category::Uiux => "UI/UX",
            Category::Functionality => "Functionality",
            Category::Responsive => "Responsive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected uiux, functionality or responsive)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uiux" | "ui/ux" | "ui" => Ok(Category::Uiux),
            "functionality" | "func" => Ok(Category::Functionality),
            "responsive" | "resp" => Ok(Category::Responsive),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A single checkbox in a category list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub label: String,
    pub checked: bool,
    /// Seeded from the catalog at creation; never flipped afterwards
    pub is_predefined: bool,
}

impl Item {
    /// A predefined (undeletable) item
    pub fn predefined(id: String, label: String) -> Self {
        Item {
            id,
            label,
            checked: false,
            is_predefined: true,
        }
    }

    /// A user-added item
    pub fn custom(id: String, label: String) -> Self {
        Item {
            id,
            label,
            checked: false,
            is_predefined: false,
        }
    }
}

/// The three category lists. The struct shape guarantees every entity has
/// exactly these keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub uiux: Vec<Item>,
    #[serde(default)]
    pub functionality: Vec<Item>,
    #[serde(default)]
    pub responsive: Vec<Item>,
}

impl Categories {
    pub fn get(&self, category: Category) -> &[Item] {
        match category {
            Category::Uiux => &self.uiux,
            Category::Functionality => &self.functionality,
            Category::Responsive => &self.responsive,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::Uiux => &mut self.uiux,
            Category::Functionality => &mut self.functionality,
            Category::Responsive => &mut self.responsive,
        }
    }

    /// Every item across all categories, in display order
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.uiux
            .iter()
            .chain(self.functionality.iter())
            .chain(self.responsive.iter())
    }
}

/// Whether entities are presented as tasks or projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Task,
    Project,
}

impl EntityKind {
    /// Prefix used when generating entity ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::Project => "project",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::Project => "project",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(EntityKind::Task),
            "project" => Ok(EntityKind::Project),
            other => Err(format!("unknown entity kind '{}' (expected task or project)", other)),
        }
    }
}

/// A task or project with its three checklists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Associated catalog entry, stored under the `projectId` key
    #[serde(rename = "projectId", default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
    pub created: DateTime<Utc>,
    pub categories: Categories,
}

impl Entity {
    pub fn items(&self, category: Category) -> &[Item] {
        self.categories.get(category)
    }

    pub fn items_mut(&mut self, category: Category) -> &mut Vec<Item> {
        self.categories.get_mut(category)
    }
}
