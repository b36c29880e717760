use serde::{Deserialize, Serialize};

use crate::error::BillError;

/// Assigned to bills recorded without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const DEFAULT_ICON: &str = "📂";

const FIXED_CATEGORIES: [(&str, &str); 6] = [
    ("Electricity", "💡"),
    ("Water", "💧"),
    ("Internet", "🌐"),
    ("Groceries", "🛒"),
    ("Credit card", "💳"),
    (UNCATEGORIZED, "🧾"),
];

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    name: String,
    #[serde(default = "default_icon")]
    icon: String,
}

impl Category {
    pub fn new(name: &str, icon: Option<&str>) -> Result<Category, BillError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BillError::validation("The category name cannot be empty"));
        }

        let icon = icon
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_ICON);

        Ok(Category {
            name: name.to_string(),
            icon: icon.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Category names are compared without regard to case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

pub fn default_categories() -> Vec<Category> {
    FIXED_CATEGORIES
        .iter()
        .map(|(name, icon)| Category {
            name: name.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}

/// The fixed categories first, then the stored ones that are neither blank
/// nor a repeat of an earlier name.
pub fn normalize(stored: Vec<Category>) -> Vec<Category> {
    let mut categories = default_categories();
    for category in stored {
        if category.name.trim().is_empty() {
            continue;
        }
        if categories.iter().any(|known| known.is_named(&category.name)) {
            continue;
        }
        categories.push(category);
    }
    categories
}

pub fn ensure_unique(existing: &[Category], candidate: &Category) -> Result<(), BillError> {
    if existing.iter().any(|category| category.is_named(&candidate.name)) {
        return Err(BillError::validation(format!(
            "The category '{}' already exists",
            candidate.name
        )));
    }
    Ok(())
}

/// Icon shown next to a bill's category. Unknown categories get the default icon.
pub fn icon_for<'a>(categories: &'a [Category], name: &str) -> &'a str {
    categories
        .iter()
        .find(|category| category.name == name)
        .map(|category| category.icon.as_str())
        .unwrap_or(DEFAULT_ICON)
}
