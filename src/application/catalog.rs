//! Catalog search and quote selection.

use crate::domain::{Catalog, Category, QuoteItem, Section, Unit};

/// Sections whose units match `unit_query` (case-insensitive substring).
///
/// Sections left without units are dropped. An empty query keeps everything.
#[must_use]
pub fn filter_sections(sections: &[Section], unit_query: &str) -> Vec<Section> {
    let query = unit_query.to_lowercase();

    sections
        .iter()
        .map(|section| Section {
            name: section.name.clone(),
            units: section
                .units
                .iter()
                .filter(|unit| unit.name.to_lowercase().contains(&query))
                .cloned()
                .collect(),
        })
        .filter(|section| !section.units.is_empty())
        .collect()
}

/// Categories of `unit` reduced to quotes whose text matches `quote_query`.
///
/// Quotes without text only match the empty query.
#[must_use]
pub fn filter_quotes(unit: &Unit, quote_query: &str) -> Vec<Category> {
    let query = quote_query.to_lowercase();

    unit.categories
        .iter()
        .map(|category| Category {
            name: category.name.clone(),
            quotes: category
                .quotes
                .iter()
                .filter(|q| {
                    query.is_empty()
                        || q
                            .text
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&query))
                })
                .cloned()
                .collect(),
        })
        .filter(|category| !category.quotes.is_empty())
        .collect()
}

/// Every quote matching both filters, as export items.
#[must_use]
pub fn select_items(catalog: &Catalog, unit_query: &str, quote_query: &str) -> Vec<QuoteItem> {
    filter_sections(&catalog.sections, unit_query)
        .iter()
        .flat_map(|section| section.units.iter())
        .flat_map(|unit| {
            filter_quotes(unit, quote_query)
                .into_iter()
                .flat_map(move |category| {
                    let unit_name = unit.name.clone();
                    category.quotes.into_iter().map(move |quote| {
                        QuoteItem::new(quote, unit_name.clone(), category.name.clone())
                    })
                })
        })
        .collect()
}
