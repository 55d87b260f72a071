//! Configuration file management.
//!
//! Handles loading and saving TOML configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# sc2-quotes configuration
# Auto-generated - edit as needed

[backend]
# Origin of the quote backend serving /api/save-to-sounds and /api/download-batch
base_url = "http://localhost:3001"

# Connect timeout in seconds (0 = wait indefinitely)
connect_timeout_secs = 0

[export]
# File name for batch ZIP downloads
zip_name = "sc2-quotes.zip"

# Hook folder used by `save` when --folder is not given
# One of: done, start, userpromptsubmit, precompact
default_folder = "done"

# How long result banners stay visible, in milliseconds
banner_ms = 3000

[paths]
# Custom data directory (optional, defaults to ~/.sc2-quotes)
# data_dir = "/custom/path"
"#;

/// Load configuration from `path`, or the default location, or built-in defaults.
///
/// An explicit `path` must exist; the default location may be missing.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return load_config_from_file(path);
    }

    let config_path = config_file_path();
    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!("No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Render configuration as TOML.
///
/// # Errors
/// Returns error if serialization fails.
pub fn config_to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })
}

/// Create default configuration file at `path` if it doesn't exist.
///
/// Returns `true` if a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_data_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SoundFolder;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:3001");
        assert_eq!(config.export.zip_name, "sc2-quotes.zip");
        assert_eq!(config.export.default_folder, SoundFolder::Done);
        assert_eq!(config.export.banner_ms, 3000);
    }

    #[test]
    fn test_config_file_ignores_custom_data_dir() {
        let config: AppConfig = toml::from_str("[paths]\ndata_dir = \"/tmp/sc2\"\n").unwrap();
        assert_eq!(config.setups_db_path(), PathBuf::from("/tmp/sc2/setups.db"));
        assert_eq!(
            config_file_path(),
            AppConfig::default_data_dir().join("config.toml")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://10.0.0.5:3001"

            [export]
            default_folder = "precompact"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://10.0.0.5:3001");
        assert_eq!(config.export.default_folder, SoundFolder::PreCompact);
        assert_eq!(config.export.zip_name, "sc2-quotes.zip");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.backend.connect_timeout_secs = 7;

        fs::write(&config_path, config_to_toml(&config).unwrap()).unwrap();
        let loaded = load_config(Some(&config_path)).unwrap();

        assert_eq!(loaded.backend.connect_timeout_secs, 7);
        assert_eq!(loaded.export.zip_name, config.export.zip_name);
    }

    #[test]
    fn test_ensure_config_exists_only_once() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("sub").join("config.toml");

        assert!(ensure_config_exists(&config_path).unwrap());
        assert!(!ensure_config_exists(&config_path).unwrap());
        assert!(load_config_from_file(&config_path).is_ok());
    }

    #[test]
    fn test_invalid_folder_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[export]\ndefault_folder = \"stop\"\n").unwrap();

        assert!(matches!(
            load_config_from_file(&config_path),
            Err(AppError::Config { .. })
        ));
    }
}
