//! Configuration loading for inbox-sync.
//!
//! Configuration is loaded from a TOML file (default: `inbox-sync.toml` in
//! the data directory).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use inbox_sync_client::{EngineConfig, ScheduleConfig};
use inbox_sync_types::Credentials;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "inbox-sync.toml";

/// Longest accepted scheduling interval (one week).
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Longest accepted bootstrap window (about ten years).
pub const MAX_BOOTSTRAP_DAYS: u32 = 3650;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Accounts to sync, one sync instance each.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Scheduling and fetch settings shared by all accounts.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Cache storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// One account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Instance id, also used in the cache file name.
    pub id: String,
    /// Base URL of the messaging service.
    pub server_url: String,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl AccountConfig {
    /// Credentials for this account.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.server_url, &self.username, &self.password)
    }
}

/// Scheduling and fetch settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Minutes between scheduled cycles (default: 30).
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Run a cycle as soon as `watch` starts (default: true).
    #[serde(default = "default_refresh_on_start")]
    pub refresh_on_start: bool,
    /// Days the first fetch of an empty cache reaches back (default: 7).
    #[serde(default = "default_bootstrap_days")]
    pub bootstrap_days: u32,
}

/// Cache storage settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory of the cache files (default: `<data dir>/cache`).
    pub cache_dir: Option<PathBuf>,
}

// Default value functions
fn default_interval_minutes() -> u64 {
    30
}

fn default_refresh_on_start() -> bool {
    true
}

fn default_bootstrap_days() -> u32 {
    7
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            refresh_on_start: default_refresh_on_start(),
            bootstrap_days: default_bootstrap_days(),
        }
    }
}

impl SyncConfig {
    /// Scheduler settings.
    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            interval: Duration::from_secs(self.interval_minutes.saturating_mul(60)),
            refresh_on_start: self.refresh_on_start,
        }
    }

    /// Engine settings.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig::default()
            .with_bootstrap_window(chrono::Duration::days(i64::from(self.bootstrap_days)))
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values a sync instance cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.interval_minutes == 0 {
            return Err(ConfigError::Invalid(
                "sync.interval_minutes must be at least 1".into(),
            ));
        }
        if self.sync.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "sync.interval_minutes must be at most {}",
                MAX_INTERVAL_MINUTES
            )));
        }
        if self.sync.bootstrap_days > MAX_BOOTSTRAP_DAYS {
            return Err(ConfigError::Invalid(format!(
                "sync.bootstrap_days must be at most {}",
                MAX_BOOTSTRAP_DAYS
            )));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.id.trim().is_empty() {
                return Err(ConfigError::Invalid("account id must not be empty".into()));
            }
            if !account
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Invalid(format!(
                    "account id '{}' may only contain letters, digits, '-' and '_'",
                    account.id
                )));
            }
            if !seen.insert(account.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate account id '{}'",
                    account.id
                )));
            }
            if let Some(field) = account.credentials().missing_field() {
                return Err(ConfigError::Invalid(format!(
                    "account '{}' is missing {}",
                    account.id, field
                )));
            }
        }
        Ok(())
    }

    /// Single demo account used with `--mock` when no config file exists.
    pub fn demo() -> Self {
        Self {
            accounts: vec![AccountConfig {
                id: "demo".to_string(),
                server_url: "https://demo.invalid".to_string(),
                username: "demo".to_string(),
                password: "demo".to_string(),
            }],
            ..Self::default()
        }
    }

    /// Cache directory, falling back to `<data_dir>/cache`.
    pub fn cache_dir(&self, data_dir: &Path) -> PathBuf {
        self.storage
            .cache_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("cache"))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// The configuration parsed but is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[[accounts]]
id = "school"
server_url = "https://school.inschool.fi"
username = "parent"
password = "secret"

[sync]
interval_minutes = 15
refresh_on_start = false

[storage]
cache_dir = "/var/cache/inbox-sync"
"#;

    fn account(id: &str) -> AccountConfig {
        AccountConfig {
            id: id.to_string(),
            server_url: "https://school.example".to_string(),
            username: "parent".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.accounts.is_empty());
        assert_eq!(config.sync.interval_minutes, 30);
        assert!(config.sync.refresh_on_start);
        assert_eq!(config.sync.bootstrap_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_from_toml_string() {
        let config: Config = toml::from_str(SAMPLE).unwrap();

        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].id, "school");
        assert_eq!(config.sync.interval_minutes, 15);
        assert!(!config.sync.refresh_on_start);
        assert_eq!(config.sync.bootstrap_days, 7);
        assert_eq!(
            config.cache_dir(Path::new("/data")),
            PathBuf::from("/var/cache/inbox-sync")
        );
    }

    #[test]
    fn config_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sync.interval_minutes, 30);
        assert_eq!(config.cache_dir(Path::new("/data")), PathBuf::from("/data/cache"));
    }

    #[test]
    fn demo_config_is_valid() {
        let config = Config::demo();
        assert_eq!(config.accounts.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn schedule_and_engine_settings() {
        let config: Config = toml::from_str(SAMPLE).unwrap();

        let schedule = config.sync.schedule();
        assert_eq!(schedule.interval, Duration::from_secs(15 * 60));
        assert!(!schedule.refresh_on_start);
        assert_eq!(config.sync.engine().bootstrap_window, chrono::Duration::days(7));
    }

    #[test]
    fn rejects_zero_interval() {
        let mut config = Config::default();
        config.sync.interval_minutes = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_oversized_interval() {
        let mut config = Config::default();
        config.sync.interval_minutes = u64::MAX / 2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.sync.interval_minutes = MAX_INTERVAL_MINUTES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn schedule_never_overflows() {
        let mut config = Config::default();
        config.sync.interval_minutes = u64::MAX;
        assert_eq!(config.sync.schedule().interval, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn rejects_oversized_bootstrap_window() {
        let toml = r#"
[sync]
bootstrap_days = 100000000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bootstrap_days"));

        let mut config = Config::default();
        config.sync.bootstrap_days = MAX_BOOTSTRAP_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let config = Config {
            accounts: vec![account("school"), account("school")],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_empty_credentials() {
        let mut acct = account("school");
        acct.password = String::new();
        let config = Config {
            accounts: vec![acct],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn rejects_path_like_ids() {
        let config = Config {
            accounts: vec![account("../escape")],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_reads_and_validates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.accounts[0].username, "parent");
    }

    #[test]
    fn from_file_missing_is_read_error() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn from_file_garbage_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[[accounts]\nid = ").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
