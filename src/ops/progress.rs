use crate::model::entity::{Category, Entity, Item};

/// Completed/total counts for a set of items. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of_items(items: &[Item]) -> Self {
        Progress {
            completed: items.iter().filter(|i| i.checked).count(),
            total: items.len(),
        }
    }

    pub fn of_category(entity: &Entity, category: Category) -> Self {
        Self::of_items(entity.items(category))
    }

    /// Progress across all three categories
    pub fn overall(entity: &Entity) -> Self {
        Category::ALL
            .into_iter()
            .map(|c| Self::of_category(entity, c))
            .fold(Progress::default(), |acc, p| Progress {
                completed: acc.completed + p.completed,
                total: acc.total + p.total,
            })
    }

    /// Nearest-integer percentage; 0 for an empty set
    pub fn percentage(self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 * 100.0 / self.total as f64).round() as u32
    }

    /// `3 / 12 completed`
    pub fn summary(self) -> String {
        format!("{} / {} completed", self.completed, self.total)
    }

    /// `25% (3/12 items)`
    pub fn detail(self) -> String {
        format!(
            "{}% ({}/{} items)",
            self.percentage(),
            self.completed,
            self.total
        )
    }

    /// Number of filled cells in a bar `width` wide
    pub fn filled_cells(self, width: usize) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.completed * width + self.total / 2) / self.total
    }

    /// Text bar such as `█████░░░░░`
    pub fn bar(self, width: usize) -> String {
        let filled = self.filled_cells(width).min(width);
        let mut s = "█".repeat(filled);
        s.push_str(&"░".repeat(width - filled));
        s
    }
}
