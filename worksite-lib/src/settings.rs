//! Application settings.
//!
//! The settings file is `~/.config/worksite/settings.toml`. Every key is
//! optional; environment variables override the file for a single run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use worksite_core::FieldStyle;

use crate::error::WorksiteError;
use crate::mode::ApiMode;

pub const DEFAULT_BASE_TEST: &str = "http://localhost:9005";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_MODE: &str = "WORKSITE_API_MODE";
pub const ENV_API_BASE: &str = "WORKSITE_API_BASE";
pub const ENV_API_BASE_PROD: &str = "WORKSITE_API_BASE_PROD";
pub const ENV_API_BASE_TEST: &str = "WORKSITE_API_BASE_TEST";
pub const ENV_DB: &str = "WORKSITE_DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub local: LocalSettings,
    pub weather: WeatherSettings,
    pub media: MediaSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub mode: ApiMode,
    /// Fallback base URL when no mode-specific one is set.
    pub base: Option<String>,
    pub base_prod: Option<String>,
    pub base_test: Option<String>,
    pub field_style: FieldStyle,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            mode: ApiMode::Local,
            base: None,
            base_prod: None,
            base_test: None,
            field_style: FieldStyle::Snake,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub location: String,
    /// Comma-separated metrics shown by default.
    pub metrics: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            location: "auckland".to_string(),
            metrics: "rain,temp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub cache_dir: Option<PathBuf>,
}

/// Canonical path to the settings file: `~/.config/worksite/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("worksite").join("settings.toml")
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, WorksiteError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents)
            .map_err(|e| WorksiteError::Settings(format!("{}: {}", path.display(), e)))
    }

    /// Settings from the default file with environment overrides applied.
    pub fn resolve() -> Result<Self, WorksiteError> {
        let mut settings = Self::load_from(&settings_path())?;
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), WorksiteError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(mode) = get(ENV_API_MODE) {
            self.api.mode = mode.parse()?;
        }
        if let Some(base) = get(ENV_API_BASE) {
            self.api.base = Some(base);
        }
        if let Some(base) = get(ENV_API_BASE_PROD) {
            self.api.base_prod = Some(base);
        }
        if let Some(base) = get(ENV_API_BASE_TEST) {
            self.api.base_test = Some(base);
        }
        if let Some(db) = get(ENV_DB) {
            self.local.database = Some(PathBuf::from(db));
        }
        Ok(())
    }

    /// Backend base URL for `mode`, or `None` in local mode or when nothing
    /// is configured for production.
    pub fn base_url_for(&self, mode: ApiMode) -> Option<String> {
        let pick = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        match mode {
            ApiMode::Local => None,
            ApiMode::BackendProd => pick(&self.api.base_prod).or_else(|| pick(&self.api.base)),
            ApiMode::BackendTest => {
                pick(&self.api.base_test).or_else(|| Some(DEFAULT_BASE_TEST.to_string()))
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    /// SQLite file for local mode: `~/.local/share/worksite/worksite.db`
    /// unless configured.
    pub fn database_path(&self) -> PathBuf {
        self.local.database.clone().unwrap_or_else(|| {
            let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            data.join("worksite").join("worksite.db")
        })
    }

    /// Media cache directory: `~/.cache/worksite/media` unless configured.
    pub fn media_cache_dir(&self) -> PathBuf {
        self.media.cache_dir.clone().unwrap_or_else(|| {
            let cache = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
            cache.join("worksite").join("media")
        })
    }
}

/// Persist the API mode in the settings file at `path`.
///
/// Uses `toml::Value` for a surgical update so other keys and unknown
/// tables are preserved.
pub fn save_mode(path: &Path, mode: ApiMode) -> Result<(), WorksiteError> {
    save_value(path, "api", "mode", toml::Value::String(mode.key().to_string()))
}

/// Set `[table] key = value` in the settings file, creating it if needed.
/// A file that exists but does not parse is left untouched.
pub fn save_value(
    path: &Path,
    table: &str,
    key: &str,
    value: toml::Value,
) -> Result<(), WorksiteError> {
    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => contents.parse::<toml::Value>().map_err(|e| {
            WorksiteError::Settings(format!("{} is not valid TOML: {}", path.display(), e))
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            toml::Value::Table(Default::default())
        }
        Err(e) => return Err(e.into()),
    };

    let root = doc
        .as_table_mut()
        .ok_or_else(|| WorksiteError::Settings("settings root is not a table".to_string()))?;
    let section = root
        .entry(table)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section = section
        .as_table_mut()
        .ok_or_else(|| WorksiteError::Settings(format!("[{table}] is not a table")))?;
    section.insert(key.to_string(), value);

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized =
        toml::to_string_pretty(&doc).map_err(|e| WorksiteError::Settings(e.to_string()))?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    log::debug!("Saved {}.{} to {}", table, key, path.display());
    Ok(())
}

/// The settings file as pretty-printed TOML, if it exists and parses.
pub fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
