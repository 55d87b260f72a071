//! Application configuration types.
//!
//! Every field has a serde default so partial config files stay valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::models::SoundFolder;

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin of the quote backend, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connect timeout in seconds (0 = none).
    #[serde(default)]
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: 0,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

impl BackendConfig {
    /// Full URL for an API path such as `/api/save-to-sounds`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Connect timeout, if one is configured.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        if self.connect_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.connect_timeout_secs))
        }
    }
}

/// Export behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name for batch downloads.
    #[serde(default = "default_zip_name")]
    pub zip_name: String,

    /// Folder used by `save` when none is given.
    #[serde(default)]
    pub default_folder: SoundFolder,

    /// How long result banners stay visible, in milliseconds.
    #[serde(default = "default_banner_ms")]
    pub banner_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            zip_name: default_zip_name(),
            default_folder: SoundFolder::default(),
            banner_ms: default_banner_ms(),
        }
    }
}

fn default_zip_name() -> String {
    "sc2-quotes.zip".to_string()
}

const fn default_banner_ms() -> u64 {
    3000
}

impl ExportConfig {
    /// Banner lifetime.
    #[must_use]
    pub const fn banner_duration(&self) -> Duration {
        Duration::from_millis(self.banner_ms)
    }
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sc2-quotes")
    }

    /// Get the setup database path.
    #[must_use]
    pub fn setups_db_path(&self) -> PathBuf {
        self.data_dir().join("setups.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:3001");
        assert_eq!(config.export.zip_name, "sc2-quotes.zip");
        assert_eq!(config.export.banner_duration(), Duration::from_secs(3));
        assert_eq!(config.export.default_folder, SoundFolder::Done);
        assert!(config.backend.connect_timeout().is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend = BackendConfig {
            base_url: "http://quotes.local:8080/".into(),
            connect_timeout_secs: 5,
        };
        assert_eq!(
            backend.endpoint("/api/download-batch"),
            "http://quotes.local:8080/api/download-batch"
        );
        assert_eq!(backend.connect_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_custom_data_dir() {
        let config = AppConfig {
            paths: PathConfig {
                data_dir: Some(PathBuf::from("/tmp/sc2")),
            },
            ..Default::default()
        };
        assert_eq!(config.setups_db_path(), PathBuf::from("/tmp/sc2/setups.db"));
    }
}
