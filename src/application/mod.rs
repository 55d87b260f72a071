//! Application layer - use cases and orchestration.
//!
//! This layer contains the export actions, setup management, and the
//! view state behind the quote browser.

pub mod banner;
pub mod catalog;
pub mod expansion;
pub mod export_service;
pub mod formatter;
pub mod selection;
pub mod setup_manager;

pub use banner::{BannerMessage, ResultBanner};
pub use catalog::{filter_quotes, filter_sections, select_items};
pub use expansion::{ExpansionState, ViewIdentity};
pub use export_service::{DownloadOutcome, ExportController, QuoteBackend, SyncSummary};
pub use formatter::{
    format_banner, format_catalog_tree, format_export_records, format_lists_table,
    format_setup, format_sound_folders,
};
pub use selection::Selection;
pub use setup_manager::{DialogMode, SetupCommand, SetupManager, SetupStore};
