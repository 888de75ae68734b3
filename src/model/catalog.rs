use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::Category;

/// A selectable project in the compiled-in catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    /// `#RRGGBB`
    pub display_color: &'static str,
}

/// The compiled-in catalog, in display order
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry { id: "wts", name: "WTS", display_color: "#3b82f6" },
    CatalogEntry { id: "hoerzu/tvdigital", name: "Hoerzu / TVDigital", display_color: "#10b981" },
    CatalogEntry { id: "schoenklinik", name: "Schön Klinik", display_color: "#8b5cf6" },
    CatalogEntry { id: "caritas", name: "Caritas", display_color: "#f59e0b" },
    CatalogEntry { id: "metrohm", name: "Metrohm", display_color: "#ef4444" },
    CatalogEntry { id: "kontron", name: "Kontron", display_color: "#ec4899" },
];

/// Look up a catalog entry by id
pub fn find_entry(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == id)
}

/// Display name for a catalog id, if known
pub fn entry_name(id: &str) -> Option<&'static str> {
    find_entry(id).map(|e| e.name)
}

/// Labels for each of the three categories
#[derive(Debug, Clone, Copy)]
pub struct CategoryLabels {
    pub uiux: &'static [&'static str],
    pub functionality: &'static [&'static str],
    pub responsive: &'static [&'static str],
}

impl CategoryLabels {
    pub fn get(&self, category: Category) -> &'static [&'static str] {
        match category {
            Category::Uiux => self.uiux,
            Category::Functionality => self.functionality,
            Category::Responsive => self.responsive,
        }
    }
}

/// A complete template set: general items plus per-catalog extras
#[derive(Debug)]
pub struct TemplateSet {
    pub general: CategoryLabels,
    pub overrides: &'static [(&'static str, CategoryLabels)],
}

impl TemplateSet {
    /// General labels followed by the catalog entry's extras for one category
    pub fn combined_labels(&self, category: Category, catalog_id: Option<&str>) -> Vec<&'static str> {
        let mut labels = self.general.get(category).to_vec();
        if let Some(id) = catalog_id
            && let Some((_, extra)) = self.overrides.iter().find(|(oid, _)| *oid == id)
        {
            labels.extend_from_slice(extra.get(category));
        }
        labels
    }
}

/// Which compiled-in template set seeds new entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Standard,
    Compact,
}

impl Template {
    pub fn set(self) -> &'static TemplateSet {
        match self {
            Template::Standard => &STANDARD,
            Template::Compact => &COMPACT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Template::Standard => "standard",
            Template::Compact => "compact",
        }
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Template::Standard),
            "compact" => Ok(Template::Compact),
            other => Err(format!(
                "unknown template '{}' (expected standard or compact)",
                other
            )),
        }
    }
}

const NONE: &[&str] = &[];

pub static STANDARD: TemplateSet = TemplateSet {
    general: CategoryLabels {
        uiux: &[
            "Consistent styling across all pages",
            "Proper spacing and alignment",
            "Readable fonts and text sizes",
            "Sufficient color contrast for accessibility",
            "Loading states for async operations",
            "Hover states for interactive elements",
            "Visual feedback for user actions",
            "Proper use of whitespace",
            "Consistent button styles",
            "Images have alt text",
            "Icons are intuitive and consistent",
            "Error messages are clear and helpful",
        ],
        functionality: &[
            "All forms validate input correctly",
            "All buttons perform expected actions",
            "Links navigate to correct destinations",
            "Error handling works properly",
            "Success messages display correctly",
            "Data saves and loads correctly",
            "Search functionality works as expected",
            "Filters and sorting work properly",
            "Authentication/authorization works",
            "API calls handle errors gracefully",
            "No console errors in browser",
            "All CRUD operations work correctly",
        ],
        responsive: &[
            "Mobile view (320px - 480px)",
            "Tablet view (768px - 1024px)",
            "Desktop view (1280px+)",
            "Test in Chrome",
            "Test in Firefox",
            "Test in Safari",
            "Test in Edge",
            "Touch interactions work on mobile",
            "Navigation menu works on all screen sizes",
            "Images scale properly",
            "Text is readable on all devices",
            "No horizontal scrolling on mobile",
        ],
    },
    overrides: &[
        (
            "wts",
            CategoryLabels {
                uiux: &[
                    "WTS branding guidelines followed",
                    "WTS color scheme applied consistently",
                ],
                functionality: &[
                    "WTS API integration working",
                    "WTS data synchronization verified",
                ],
                responsive: &["WTS mobile app compatibility checked"],
            },
        ),
        (
            "hoerzu/tvdigital",
            CategoryLabels {
                uiux: &[
                    "TV guide layout optimized",
                    "Program listings readable",
                    "Magazine-style design elements present",
                ],
                functionality: &[
                    "TV schedule data loading correctly",
                    "Program search working",
                    "Recording reminders functional",
                ],
                responsive: &["TV guide grid responsive on all devices"],
            },
        ),
        (
            "schoenklinik",
            CategoryLabels {
                uiux: &[
                    "Medical/healthcare design standards met",
                    "Accessibility for patients verified",
                    "Professional healthcare appearance",
                ],
                functionality: &[
                    "Appointment booking system tested",
                    "Patient portal functionality verified",
                    "HIPAA/GDPR compliance checked",
                ],
                responsive: &["Works on tablets in clinical settings"],
            },
        ),
        (
            "caritas",
            CategoryLabels {
                uiux: &[
                    "Charity/non-profit design approach",
                    "Donation interface user-friendly",
                    "Inclusive design principles applied",
                ],
                functionality: &[
                    "Donation processing working",
                    "Volunteer registration tested",
                    "Multi-language support verified",
                ],
                responsive: &["Accessible on low-end devices"],
            },
        ),
        ("metrohm", METROHM),
        ("kontron", KONTRON),
    ],
};

pub static COMPACT: TemplateSet = TemplateSet {
    general: CategoryLabels {
        uiux: &[
            "Visual design matches requirements",
            "UI elements are clearly visible and accessible",
            "User interactions feel intuitive",
            "No visual bugs or glitches",
            "Accessibility for feature verified",
        ],
        functionality: &[
            "The feature works as described in the ticket",
            "The feature doesn't break the site when data is missing",
            "Error states are handled gracefully",
            "No console errors in browser",
        ],
        responsive: &[
            "Works on android devices",
            "Works on ios devices",
            "Works on tablet devices",
            "Works on desktop browsers",
            "No layout breaks on different screen sizes",
        ],
    },
    overrides: &[
        (
            "wts",
            CategoryLabels {
                uiux: &[
                    "WTS branding guidelines followed",
                    "WTS color scheme applied consistently",
                ],
                functionality: &["Search stage working"],
                responsive: NONE,
            },
        ),
        (
            "hoerzu/tvdigital",
            CategoryLabels {
                uiux: &["Program listings readable"],
                functionality: &[
                    "TV schedule data loading correctly",
                    "Program search working",
                    "Recording reminders functional",
                    "Ads are working",
                ],
                responsive: &["TV guide grid responsive on all devices"],
            },
        ),
        (
            "schoenklinik",
            CategoryLabels {
                uiux: &["Design according to styleguide"],
                functionality: &["Patient portal functionality verified"],
                responsive: NONE,
            },
        ),
        (
            "caritas",
            CategoryLabels {
                uiux: NONE,
                functionality: &[
                    "Donation processing working",
                    "Multi-language support verified",
                ],
                responsive: NONE,
            },
        ),
        ("metrohm", METROHM),
        ("kontron", KONTRON),
    ],
};

// Shared by both template sets
const METROHM: CategoryLabels = CategoryLabels {
    uiux: &[
        "Industrial/technical design aesthetic",
        "Technical documentation accessible",
        "Product catalog well-organized",
    ],
    functionality: &[
        "Product configurator working",
        "Technical specs display correctly",
        "B2B ordering system functional",
    ],
    responsive: &["Works in industrial tablet environments"],
};

const KONTRON: CategoryLabels = CategoryLabels {
    uiux: &[
        "Enterprise technology design standards",
        "Technical product presentation clear",
        "B2B interface professional",
    ],
    functionality: &[
        "Product comparison tools working",
        "Technical documentation downloads functional",
        "Partner portal access verified",
    ],
    responsive: &["Optimized for business environments"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_override_references_a_catalog_entry() {
        for template in [Template::Standard, Template::Compact] {
            for (id, _) in template.set().overrides {
                assert!(find_entry(id).is_some(), "{} has no catalog entry", id);
            }
        }
    }

    #[test]
    fn combined_labels_appends_overrides() {
        let labels = STANDARD.combined_labels(Category::Uiux, Some("wts"));
        assert_eq!(labels.len(), 14);
        assert_eq!(labels[0], "Consistent styling across all pages");
        assert_eq!(labels[12], "WTS branding guidelines followed");
        assert_eq!(labels[13], "WTS color scheme applied consistently");
    }

    #[test]
    fn combined_labels_without_catalog_is_general_only() {
        let labels = COMPACT.combined_labels(Category::Functionality, None);
        assert_eq!(labels, COMPACT.general.functionality.to_vec());
    }

    #[test]
    fn combined_labels_unknown_catalog_is_general_only() {
        let labels = STANDARD.combined_labels(Category::Responsive, Some("nope"));
        assert_eq!(labels.len(), 12);
    }

    #[test]
    fn empty_override_list_adds_nothing() {
        let labels = COMPACT.combined_labels(Category::Responsive, Some("wts"));
        assert_eq!(labels.len(), COMPACT.general.responsive.len());
    }

    #[test]
    fn template_parse() {
        assert_eq!("compact".parse::<Template>().unwrap(), Template::Compact);
        assert!("huge".parse::<Template>().is_err());
    }

    #[test]
    fn entry_lookup() {
        assert_eq!(entry_name("schoenklinik"), Some("Schön Klinik"));
        assert_eq!(entry_name("unknown"), None);
    }
}
