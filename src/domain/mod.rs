//! Domain layer - core types and pure logic.
//!
//! This layer contains quote and setup models, filename derivation,
//! and configuration types without any IO.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod setup;

pub use catalog::{Catalog, Category, Section, Unit};
pub use config::{AppConfig, BackendConfig, ExportConfig, PathConfig};
pub use error::{AppError, Result};
pub use models::{
    DownloadRequest, ErrorBody, ExportRecord, Quote, QuoteItem, SaveRequest, SaveResponse,
    SoundFolder,
};
pub use naming::{
    build_export_record, create_quote_suffix, extract_filename, prepare_export,
    sanitize_filename, DEFAULT_SUFFIX_LENGTH,
};
pub use setup::{
    is_default_list, Hook, Recommendation, Setup, SetupDocument, SetupList, DEFAULT_LIST_ID,
    DEFAULT_LIST_NAME,
};
