//! Categories group transactions and carry display hints for the UI.

use crate::{
    EngineError, ResultEngine,
    transactions::MAX_CATEGORY_CHARS,
    util::required_text,
};

const MAX_ICON_CHARS: usize = 50;
const MAX_COLOR_CHARS: usize = 20;

/// `(name, icon, color)` seeded into every new store, in this order.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 7] = [
    ("Food & Dining", "fas fa-utensils", "#E74C3C"),
    ("Transportation", "fas fa-bus", "#F39C12"),
    ("Entertainment", "fas fa-film", "#9B59B6"),
    ("Shopping", "fas fa-shopping-bag", "#3498DB"),
    ("Bills & Utilities", "fas fa-bolt", "#E67E22"),
    ("Healthcare", "fas fa-heartbeat", "#1ABC9C"),
    ("Income", "fas fa-plus", "#2ECC71"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl NewCategory {
    pub fn new(name: &str, icon: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }

    pub(crate) fn validated(self) -> ResultEngine<Self> {
        let mut errors = Vec::new();
        let name = required_text(&self.name, "name", MAX_CATEGORY_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let icon = required_text(&self.icon, "icon", MAX_ICON_CHARS)
            .map_err(|e| errors.push(e))
            .ok();
        let color = required_text(&self.color, "color", MAX_COLOR_CHARS)
            .map_err(|e| errors.push(e))
            .ok();

        match (name, icon, color) {
            (Some(name), Some(icon), Some(color)) => Ok(Self { name, icon, color }),
            _ => Err(EngineError::Validation(errors)),
        }
    }
}

pub(crate) fn defaults() -> impl Iterator<Item = NewCategory> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, icon, color)| NewCategory::new(name, icon, color))
}
