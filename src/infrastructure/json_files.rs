//! JSON input and output files: catalogs, selections, and setup documents.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::domain::{AppError, Catalog, QuoteItem, Result, SetupDocument};

/// Read and parse a JSON file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(AppError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?;

    serde_json::from_str(&content).map_err(AppError::json_parse)
}

/// Load a quote catalog.
///
/// # Errors
/// Returns error if the file is missing or is not a catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog: Catalog = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        sections = catalog.sections.len(),
        "Loaded catalog"
    );
    Ok(catalog)
}

/// Load a selection file: a JSON array of quote items.
///
/// # Errors
/// Returns error if the file is missing or malformed.
pub fn load_selection(path: &Path) -> Result<Vec<QuoteItem>> {
    read_json(path)
}

/// Write a selection file.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn save_selection(path: &Path, items: &[QuoteItem]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).map_err(AppError::json_parse)?;
    write_file(path, &json)
}

/// Read an exported setup document.
///
/// Only `.json` files are accepted.
///
/// # Errors
/// Returns error for other extensions, missing files, or malformed JSON.
pub fn read_setup_document(path: &Path) -> Result<SetupDocument> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(AppError::InvalidData {
            message: format!("Setup file must be .json: {}", path.display()),
        });
    }

    read_json(path)
}

/// Serialize a setup document as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn setup_document_json(document: &SetupDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(AppError::json_parse)
}

/// Write a setup document to `path`.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn write_setup_document(path: &Path, document: &SetupDocument) -> Result<()> {
    write_file(path, &setup_document_json(document)?)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create {}", parent.display()), e))?;
    }

    fs::write(path, content)
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))
}
