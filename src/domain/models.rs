//! Domain models for quotes, export payloads, and hook folders.
//!
//! Field names follow the backend's JSON (camelCase) so these types double as
//! wire types for the export endpoints.

use serde::{Deserialize, Serialize};

use super::error::AppError;

/// A single voice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Remote location of the `.ogg` audio.
    pub audio_url: String,
    /// Spoken text, if transcribed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A quote together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub quote: Quote,
    pub unit_name: String,
    pub category_name: String,
}

impl QuoteItem {
    /// Create a new item.
    #[must_use]
    pub fn new(quote: Quote, unit_name: impl Into<String>, category_name: impl Into<String>) -> Self {
        Self {
            quote,
            unit_name: unit_name.into(),
            category_name: category_name.into(),
        }
    }
}

/// Normalized record sent to both export endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub audio_url: String,
    pub filename: String,
    pub unit_name: String,
    pub category_name: String,
}

/// Hook folder under the sound-configuration directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundFolder {
    /// When Claude finishes.
    #[default]
    Done,
    /// Session start.
    Start,
    /// Prompt submitted.
    UserPromptSubmit,
    /// Before compaction.
    PreCompact,
}

impl SoundFolder {
    /// Every folder, in display order.
    pub const ALL: [Self; 4] = [
        Self::Done,
        Self::Start,
        Self::UserPromptSubmit,
        Self::PreCompact,
    ];

    /// Directory name as the backend expects it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Start => "start",
            Self::UserPromptSubmit => "userpromptsubmit",
            Self::PreCompact => "precompact",
        }
    }

    /// Short description of the triggering event.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Done => "When Claude finishes",
            Self::Start => "Session start",
            Self::UserPromptSubmit => "Prompt submitted",
            Self::PreCompact => "Before compaction",
        }
    }
}

impl std::fmt::Display for SoundFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SoundFolder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| AppError::Config {
                message: format!(
                    "Unknown sound folder: {s}. Use: done, start, userpromptsubmit, precompact"
                ),
            })
    }
}

/// Body of `POST /api/save-to-sounds`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRequest {
    pub quotes: Vec<ExportRecord>,
    pub folder: SoundFolder,
}

/// Body of `POST /api/download-batch`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub quotes: Vec<ExportRecord>,
}

/// Successful reply of `POST /api/save-to-sounds`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Newly written files.
    pub saved: usize,
    /// Directory the files landed in.
    #[serde(default)]
    pub target_dir: String,
    /// Files already present and left alone.
    #[serde(default)]
    pub skipped: usize,
    /// Stale files removed during a sync.
    #[serde(default)]
    pub deleted: usize,
}

/// Error reply shape shared by backend endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
