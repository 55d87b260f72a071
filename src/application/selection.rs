//! Quote selection state.

use crate::domain::QuoteItem;

/// Ordered set of selected quotes, keyed by audio URL.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: Vec<QuoteItem>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a selection from items, dropping duplicates.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = QuoteItem>) -> Self {
        let mut selection = Self::new();
        for item in items {
            selection.select(item);
        }
        selection
    }

    /// Add an item. Returns `false` if it was already selected.
    pub fn select(&mut self, item: QuoteItem) -> bool {
        if self.is_selected(&item.quote.audio_url) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Whether a quote with this audio URL is selected.
    #[must_use]
    pub fn is_selected(&self, audio_url: &str) -> bool {
        self.items.iter().any(|i| i.quote.audio_url == audio_url)
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of selected quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected items in selection order.
    #[must_use]
    pub fn items(&self) -> &[QuoteItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quote;

    fn item(url: &str) -> QuoteItem {
        QuoteItem::new(
            Quote {
                audio_url: url.into(),
                text: None,
            },
            "Zealot",
            "What",
        )
    }

    #[test]
    fn test_select_dedupes() {
        let mut selection = Selection::new();
        assert!(selection.select(item("a.ogg")));
        assert!(!selection.select(item("a.ogg")));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::from_items([item("a.ogg")]);
        selection.clear();
        assert!(selection.is_empty());
    }
}
