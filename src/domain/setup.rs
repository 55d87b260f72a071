//! Setup lists: named collections of hook → sound bindings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{Quote, QuoteItem, SoundFolder};

/// Id of the list that always exists and cannot be deleted.
pub const DEFAULT_LIST_ID: &str = "default";

/// Display name of the default list.
pub const DEFAULT_LIST_NAME: &str = "Default Setup";

/// Current version of the exported setup document.
pub const SETUP_DOCUMENT_VERSION: u32 = 1;

/// A named setup list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupList {
    pub id: String,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl SetupList {
    /// Whether this is the protected default list.
    #[must_use]
    pub fn is_default(&self) -> bool {
        is_default_list(&self.id)
    }
}

/// Whether `id` names the protected default list.
#[must_use]
pub fn is_default_list(id: &str) -> bool {
    id == DEFAULT_LIST_ID
}

/// A sound recommended for a hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Quote text.
    #[serde(default)]
    pub text: String,
    /// Unit that speaks the line.
    pub unit: String,
    /// Faction of the unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    pub audio_url: String,
    /// Quote category within the unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Recommendation {
    /// Build a recommendation from a selected quote.
    #[must_use]
    pub fn from_item(item: &QuoteItem, race: Option<String>) -> Self {
        Self {
            text: item.quote.text.clone().unwrap_or_default(),
            unit: item.unit_name.clone(),
            race,
            audio_url: item.quote.audio_url.clone(),
            category: Some(item.category_name.clone()),
        }
    }

    /// View this recommendation as an export-pipeline item.
    ///
    /// Falls back to the hook name when no category is recorded.
    #[must_use]
    pub fn to_item(&self, hook_name: &str) -> QuoteItem {
        QuoteItem::new(
            Quote {
                audio_url: self.audio_url.clone(),
                text: Some(self.text.clone()).filter(|t| !t.is_empty()),
            },
            self.unit.clone(),
            self.category.clone().unwrap_or_else(|| hook_name.to_string()),
        )
    }
}

/// Recommendations grouped under one event hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl Hook {
    /// Empty hook for a sound folder.
    #[must_use]
    pub fn for_folder(folder: SoundFolder) -> Self {
        Self {
            name: folder.as_str().to_string(),
            description: folder.description().to_string(),
            recommendations: Vec::new(),
        }
    }

    /// Sound folder this hook syncs into, if its name is one.
    #[must_use]
    pub fn folder(&self) -> Option<SoundFolder> {
        self.name.parse().ok()
    }

    /// Export-pipeline items for every recommendation.
    #[must_use]
    pub fn items(&self) -> Vec<QuoteItem> {
        self.recommendations
            .iter()
            .map(|r| r.to_item(&self.name))
            .collect()
    }

    /// Append quotes not already present (by audio URL). Returns how many were added.
    pub fn add_items(&mut self, items: &[QuoteItem], race: Option<&str>) -> usize {
        let mut added = 0;
        for item in items {
            let exists = self
                .recommendations
                .iter()
                .any(|r| r.audio_url == item.quote.audio_url);
            if !exists {
                self.recommendations
                    .push(Recommendation::from_item(item, race.map(String::from)));
                added += 1;
            }
        }
        added
    }
}

/// A list together with its hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub list: SetupList,
    pub hooks: Vec<Hook>,
}

impl Setup {
    /// Total number of sounds across hooks.
    #[must_use]
    pub fn total_sounds(&self) -> usize {
        self.hooks.iter().map(|h| h.recommendations.len()).sum()
    }

    /// Every recommendation of every hook as export items.
    #[must_use]
    pub fn all_items(&self) -> Vec<QuoteItem> {
        self.hooks.iter().flat_map(Hook::items).collect()
    }

    /// Hook named `name`, appended if missing.
    ///
    /// Sound folder names get the folder's description.
    pub fn hook_entry(&mut self, name: &str) -> &mut Hook {
        let index = match self.hooks.iter().position(|h| h.name == name) {
            Some(index) => index,
            None => {
                let hook = match name.parse::<SoundFolder>() {
                    Ok(folder) if folder.as_str() == name => Hook::for_folder(folder),
                    _ => Hook {
                        name: name.to_string(),
                        description: String::new(),
                        recommendations: Vec::new(),
                    },
                };
                self.hooks.push(hook);
                self.hooks.len() - 1
            }
        };
        &mut self.hooks[index]
    }

    /// Hooks every new list starts with.
    #[must_use]
    pub fn default_hooks() -> Vec<Hook> {
        SoundFolder::ALL.into_iter().map(Hook::for_folder).collect()
    }
}

/// Portable JSON form of a setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupDocument {
    #[serde(default = "default_document_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hooks: Vec<Hook>,
}

const fn default_document_version() -> u32 {
    SETUP_DOCUMENT_VERSION
}

impl SetupDocument {
    /// Snapshot a setup for export.
    #[must_use]
    pub fn from_setup(setup: &Setup) -> Self {
        Self {
            version: SETUP_DOCUMENT_VERSION,
            name: setup.list.name.clone(),
            exported_at: Some(Utc::now()),
            hooks: setup.hooks.clone(),
        }
    }
}
