//! Expand/collapse memory for sidebar sections.
//!
//! State is remembered per view identity. Looking at a different view (or a
//! different list, or the same view with other sections) starts over with
//! every section expanded.

use std::collections::HashMap;

/// What the sidebar is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIdentity {
    /// Hooks of a setup list.
    Recommended { list_id: String, hooks: Vec<String> },
    /// Sections of a faction or catalog view.
    Sections { view: String, sections: Vec<String> },
}

impl ViewIdentity {
    /// Composite key the expansion state is stored under.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Recommended { list_id, hooks } => format!("rec:{list_id}:{}", hooks.join(",")),
            Self::Sections { view, sections } => format!("{view}:{}", sections.join(",")),
        }
    }
}

/// Expansion flags for the sections of one view.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    key: String,
    sections: HashMap<String, bool>,
}

impl ExpansionState {
    /// Create an empty state; every section reads as expanded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `section` is expanded under `view`.
    #[must_use]
    pub fn is_expanded(&self, view: &ViewIdentity, section: &str) -> bool {
        if self.key != view.key() {
            return true;
        }
        self.sections.get(section).copied().unwrap_or(true)
    }

    /// Flip `section` under `view`, resetting stored flags if the view changed.
    pub fn toggle(&mut self, view: &ViewIdentity, section: &str) {
        let key = view.key();
        if self.key != key {
            tracing::trace!(%key, "Expansion state reset for new view");
            self.key = key;
            self.sections.clear();
        }

        let expanded = self.sections.get(section).copied().unwrap_or(true);
        self.sections.insert(section.to_string(), !expanded);
    }
}
