//! Configuration management for tracelink.
//!
//! Built-in defaults, then an optional TOML file, then `TRACELINK_`
//! environment variables, merged with figment. The result is validated
//! before anyone sees it.

use std::path::PathBuf;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the platform config and data directories.
const DATA_DIR_NAME: &str = "tracelink";

const DATABASE_FILE_NAME: &str = "tracelink.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "TRACELINK_";

/// Default number of entries kept in the store.
pub const DEFAULT_MAX_ENTRIES: usize = 15;

/// Default lifetime of an entry in days.
pub const DEFAULT_ENTRY_TTL_DAYS: u32 = 7;

/// Default key the entry list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "entries";

/// Settings for the store, shareable links and reference data.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TRACELINK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/tracelink/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entry store settings.
    pub storage: StorageConfig,
    /// Shareable link configuration.
    pub links: LinksConfig,
    /// Reference data configuration.
    pub catalog: CatalogConfig,
}

/// Where and how entries are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. Defaults to `~/.local/share/tracelink/tracelink.db`.
    pub database_path: Option<PathBuf>,
    /// Maximum number of entries to retain, newest first.
    pub max_entries: usize,
    /// Days an entry stays viewable after creation.
    pub entry_ttl_days: u32,
    /// Key under which the serialized entry list is stored.
    pub storage_key: String,
}

/// Shareable link configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Origin prepended to `/view/{id}` when building shareable URLs.
    pub base_url: String,
}

/// Reference data locations. Unset paths use the bundled data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON array of users.
    pub users_path: Option<PathBuf>,
    /// JSON array of product names.
    pub products_path: Option<PathBuf>,
    /// JSON array of growing locations.
    pub locations_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Lifetime of a new entry.
    #[must_use]
    pub fn entry_ttl(&self) -> Duration {
        Duration::days(i64::from(self.entry_ttl_days))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            max_entries: DEFAULT_MAX_ENTRIES,
            entry_ttl_days: DEFAULT_ENTRY_TTL_DAYS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, reading `config_path` or the default config file.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/tracelink/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// `<data_local_dir>/tracelink`.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Reject values the store cannot work with.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_entries == 0 {
            return Err(Error::ConfigValidation {
                message: "max_entries must be greater than 0".to_string(),
            });
        }

        if self.storage.entry_ttl_days == 0 {
            return Err(Error::ConfigValidation {
                message: "entry_ttl_days must be greater than 0".to_string(),
            });
        }

        if self.storage.storage_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage_key must not be empty".to_string(),
            });
        }

        let base_url = &self.links.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("base_url must be an http(s) URL: {base_url}"),
            });
        }

        Ok(())
    }

    /// The configured database file, or `tracelink.db` in the data directory.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert!(storage.database_path.is_none());
        assert_eq!(storage.max_entries, 15);
        assert_eq!(storage.entry_ttl_days, 7);
        assert_eq!(storage.storage_key, "entries");
    }

    #[test]
    fn test_default_links_config() {
        assert_eq!(LinksConfig::default().base_url, "http://localhost:3000");
    }

    #[test]
    fn test_default_catalog_config() {
        let catalog = CatalogConfig::default();
        assert!(catalog.users_path.is_none());
        assert!(catalog.products_path.is_none());
        assert!(catalog.locations_path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_max_entries() {
        let mut config = Config::default();
        config.storage.max_entries = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_entries"));
    }

    #[test]
    fn test_validate_zero_ttl() {
        let mut config = Config::default();
        config.storage.entry_ttl_days = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("entry_ttl_days"));
    }

    #[test]
    fn test_validate_blank_storage_key() {
        let mut config = Config::default();
        config.storage.storage_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage_key"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::default();
        config.links.base_url = "ftp://example.com".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("tracelink.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_entry_ttl() {
        let mut storage = StorageConfig::default();
        assert_eq!(storage.entry_ttl(), Duration::days(7));

        storage.entry_ttl_days = 30;
        assert_eq!(storage.entry_ttl(), Duration::days(30));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("tracelink"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[storage]\nmax_entries = 3\nentry_ttl_days = 1\n\n[links]\nbase_url = \"https://trace.example\""
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.storage.max_entries, 3);
        assert_eq!(config.storage.entry_ttl_days, 1);
        assert_eq!(config.storage.storage_key, "entries");
        assert_eq!(config.links.base_url, "https://trace.example");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\nmax_entries = 0").unwrap();

        let result = Config::load_from(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"max_entries": 50, "entry_ttl_days": 30}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.max_entries, 50);
        assert_eq!(storage.entry_ttl_days, 30);
        assert_eq!(storage.storage_key, "entries");
    }
}
