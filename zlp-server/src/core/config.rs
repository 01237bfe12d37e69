//! Runtime configuration and the persisted settings file
//!
//! Two layers:
//!
//! | Layer | Source | Type |
//! |-------|--------|------|
//! | Process options | command line / environment | [`Config`] |
//! | User settings | `gui_config.json` in the application folder | [`AppConfig`] via [`ConfigStore`] |
//!
//! The settings file is shared with the control panel. Keys this build does
//! not know are kept on disk (merge-on-write) and keys missing on disk are
//! filled from defaults and written back (merge-on-read).

use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use shared::models::AppConfig;
use thiserror::Error;

/// Environment variable overriding the application folder
pub const HOME_ENV: &str = "ZLP_HOME";
/// Folder name under the user's documents directory
pub const APP_FOLDER_NAME: &str = "Zebra Label Printer";
/// Settings file name inside the application folder
pub const CONFIG_FILE_NAME: &str = "gui_config.json";
/// Print event log file name inside the application folder
pub const PRINT_LOG_FILE_NAME: &str = "log.txt";

/// Resolve the application folder
///
/// Order: explicit path, `$ZLP_HOME`, `<Documents>/Zebra Label Printer`,
/// current directory.
pub fn app_folder(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    match dirs::document_dir() {
        Some(docs) => docs.join(APP_FOLDER_NAME),
        None => PathBuf::from("."),
    }
}

/// Process options for one server run
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder holding settings, print log and diagnostic logs
    pub app_folder: PathBuf,
    /// HTTP port (overrides `server_port` from the settings file)
    pub http_port: u16,
    pub bind_addr: IpAddr,
}

impl Config {
    pub fn new(app_folder: PathBuf, http_port: u16) -> Self {
        Self {
            app_folder,
            http_port,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.app_folder.join(CONFIG_FILE_NAME)
    }

    pub fn print_log_file(&self) -> PathBuf {
        self.app_folder.join(PRINT_LOG_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.app_folder.join("logs")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings file I/O failed ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file is not valid: {0}")]
    Parse(String),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the JSON settings file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store for `gui_config.json` inside `app_folder`
    pub fn in_folder(app_folder: &Path) -> Self {
        Self::new(app_folder.join(CONFIG_FILE_NAME))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings with merge-on-read
    ///
    /// A missing file is created with defaults. Missing keys are backfilled,
    /// known keys holding a value of the wrong type are reset to their
    /// default, and the file is rewritten when either happened.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "Settings file missing, writing defaults");
            let config = AppConfig::default();
            self.write_map(&to_map(&config)?)?;
            return Ok(config);
        }

        let mut map = self.read_map()?;
        let mut backfilled = Vec::new();
        let mut reset = Vec::new();
        for (key, default) in to_map(&AppConfig::default())? {
            match map.get(&key) {
                None => {
                    backfilled.push(key.clone());
                    map.insert(key, default);
                }
                Some(value) if !value_fits(&key, value) => {
                    tracing::warn!(key = %key, value = %value, "Invalid setting, using default");
                    reset.push(key.clone());
                    map.insert(key, default);
                }
                Some(_) => {}
            }
        }

        let config: AppConfig = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        if !backfilled.is_empty() || !reset.is_empty() {
            if !backfilled.is_empty() {
                tracing::info!(keys = ?backfilled, "Backfilled missing settings");
            }
            self.write_map(&map)?;
        }

        Ok(config)
    }

    /// [`load`](Self::load), falling back to defaults when the file cannot
    /// be read or is not a JSON object
    pub fn load_or_default(&self) -> AppConfig {
        match self.load() {
            Ok(config) => {
                tracing::info!(path = %self.path.display(), "Settings loaded");
                config
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load settings, using defaults");
                AppConfig::default()
            }
        }
    }

    /// Save settings with merge-on-write
    ///
    /// Keys present on disk but unknown to `config` are left untouched. An
    /// unreadable existing file is replaced.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let mut map = if self.path.exists() {
            self.read_map().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Existing settings unreadable, replacing");
                Map::new()
            })
        } else {
            Map::new()
        };

        map.extend(to_map(config)?);
        self.write_map(&map)?;
        tracing::info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>, ConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ConfigError::Parse("expected a JSON object".to_string())),
            Err(e) => Err(ConfigError::Parse(e.to_string())),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

/// Whether `value` deserializes as the known setting `key`
fn value_fits(key: &str, value: &Value) -> bool {
    let mut single = Map::new();
    single.insert(key.to_string(), value.clone());
    serde_json::from_value::<AppConfig>(Value::Object(single)).is_ok()
}

fn to_map(config: &AppConfig) -> Result<Map<String, Value>, ConfigError> {
    match serde_json::to_value(config)? {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::Parse("settings did not serialize to an object".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{PriceSuggestionType, TransportKind};

    #[test]
    fn test_missing_file_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());

        let config = store.load().unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(store.path().exists());
    }

    #[test]
    fn test_backfill_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());
        fs::write(store.path(), r#"{"currency": "PLN", "printer_ip": "10.0.0.7"}"#).unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.currency, "PLN");
        assert_eq!(config.printer_ip, "10.0.0.7");
        assert_eq!(config.server_port, "5000");
        assert!(config.start_server_on_launch);

        let on_disk: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        for key in AppConfig::KNOWN_KEYS {
            assert!(on_disk.contains_key(key), "missing {key}");
        }
        assert_eq!(on_disk["currency"], "PLN");
    }

    #[test]
    fn test_unknown_key_survives_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());
        fs::write(store.path(), r#"{"foo": "bar"}"#).unwrap();

        let mut config = store.load().unwrap();
        config.print_mode = TransportKind::Usb;
        config.price_suggestion_type = PriceSuggestionType::Czech;
        store.save(&config).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.extra.get("foo"), Some(&Value::from("bar")));
        assert_eq!(reloaded.print_mode, TransportKind::Usb);
        assert_eq!(reloaded.price_suggestion_type, PriceSuggestionType::Czech);
    }

    #[test]
    fn test_save_keeps_keys_added_on_disk_later() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());
        let config = store.load().unwrap();

        // Another writer adds a key after we loaded
        let mut map: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        map.insert("window_x".into(), Value::from(120));
        fs::write(store.path(), serde_json::to_string(&map).unwrap()).unwrap();

        store.save(&config).unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.extra.get("window_x"), Some(&Value::from(120)));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_typed_value_reset_without_losing_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());
        fs::write(
            store.path(),
            r#"{"printer_ip": "10.0.0.9", "decimal_places": "3", "print_mode": "FAX", "foo": 1}"#,
        )
        .unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.printer_ip, "10.0.0.9");
        assert_eq!(config.decimal_places, 2);
        assert_eq!(config.print_mode, TransportKind::NetTcp);
        assert_eq!(config.extra.get("foo"), Some(&Value::from(1)));

        let on_disk: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["decimal_places"], 2);
        assert_eq!(on_disk["print_mode"], "NET/TCP");
        assert_eq!(on_disk["printer_ip"], "10.0.0.9");
    }

    #[test]
    fn test_load_or_default_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::in_folder(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load_or_default(), AppConfig::default());
    }

    #[test]
    fn test_explicit_app_folder_wins() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(app_folder(Some(dir.path())), dir.path());
    }
}
