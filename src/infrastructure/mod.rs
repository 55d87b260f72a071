//! Infrastructure layer - external adapters (HTTP, database, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod archive;
pub mod config;
pub mod http_backend;
pub mod json_files;
pub mod setup_store;

pub use config::{config_file_path, config_to_toml, ensure_config_exists, load_config};
pub use http_backend::HttpBackend;
pub use json_files::{
    load_catalog, load_selection, read_setup_document, save_selection, setup_document_json,
    write_setup_document,
};
pub use setup_store::SetupDb;
