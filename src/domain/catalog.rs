//! Quote catalog as served to the browser: sections → units → categories → quotes.

use serde::{Deserialize, Serialize};

use super::models::Quote;

/// Quotes of one unit that share a category (e.g. "What", "Pissed").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

/// A unit, hero, or building with voice lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Unit {
    /// Total quotes across categories.
    #[must_use]
    pub fn quote_count(&self) -> usize {
        self.categories.iter().map(|c| c.quotes.len()).sum()
    }
}

/// Sidebar section grouping units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

/// A full catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}
