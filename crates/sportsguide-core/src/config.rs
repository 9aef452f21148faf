//! TOML-based configuration.
//!
//! Holds everything a run needs:
//! - where the listing page lives and how to find event cards in it
//! - event duration, channel pool size, coverage end hour, horizon
//! - placeholder values for missing fields
//! - output paths and channel naming
//!
//! Configuration is stored at `~/.config/sportsguide/config.toml`, or under
//! `$SPORTSGUIDE_HOME` when that variable is set.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable overriding the configuration directory.
pub const HOME_ENV: &str = "SPORTSGUIDE_HOME";

/// Upper bound for `schedule.event_duration_hours`.
pub const MAX_EVENT_DURATION_HOURS: f64 = 168.0;

/// Upper bound for `schedule.max_days_ahead`.
pub const MAX_DAYS_AHEAD: u32 = 366;

/// CSS selectors locating event cards and their fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorSettings {
    #[serde(default = "default_card_selector")]
    pub card: String,
    #[serde(default = "default_category_selector")]
    pub category: String,
    #[serde(default = "default_title_selector")]
    pub title: String,
    /// Matches the date label first, then the time label.
    #[serde(default = "default_time_labels_selector")]
    pub time_labels: String,
}

/// Listing page source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub selectors: SelectorSettings,
}

/// Scheduling constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Fixed length of every event.
    #[serde(default = "default_event_duration_hours")]
    pub event_duration_hours: f64,
    /// Hour of day (0-23) at which the coverage window closes.
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_max_channels")]
    pub max_channels: usize,
    /// Events starting later than this many days from now are dropped.
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: u32,
}

/// Placeholders for fields the page did not provide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeSettings {
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_title")]
    pub default_title: String,
}

/// Output files and channel naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_epg_path")]
    pub epg_path: PathBuf,
    #[serde(default = "default_listing_path")]
    pub listing_path: PathBuf,
    #[serde(default = "default_channel_id_prefix")]
    pub channel_id_prefix: String,
    #[serde(default = "default_channel_name_prefix")]
    pub channel_name_prefix: String,
    #[serde(default = "default_filler_title")]
    pub filler_title: String,
    #[serde(default = "default_title_lang")]
    pub title_lang: String,
}

/// Application configuration.
///
/// Serialized to/from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub normalize: NormalizeSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

// Default functions
fn default_url() -> String {
    "https://www.peacocktv.com/watch/sports/live-and-upcoming".into()
}
fn default_user_agent() -> String {
    concat!("sportsguide/", env!("CARGO_PKG_VERSION")).into()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_card_selector() -> String {
    "div[data-testid='metadata-container']".into()
}
fn default_category_selector() -> String {
    "span[class*='UhaIOWe7cS']".into()
}
fn default_title_selector() -> String {
    "h4[class*='QG1uxEKQ4X']".into()
}
fn default_time_labels_selector() -> String {
    "li.a7rB6G4p8N > span".into()
}
fn default_event_duration_hours() -> f64 {
    4.5
}
fn default_end_hour() -> u32 {
    4
}
fn default_max_channels() -> usize {
    7
}
fn default_max_days_ahead() -> u32 {
    7
}
fn default_category() -> String {
    "Sports".into()
}
fn default_title() -> String {
    "N/A".into()
}
fn default_epg_path() -> PathBuf {
    PathBuf::from("peacock_epg.xml")
}
fn default_listing_path() -> PathBuf {
    PathBuf::from("peacock_events.txt")
}
fn default_channel_id_prefix() -> String {
    "peacocksports".into()
}
fn default_channel_name_prefix() -> String {
    "Peacock Sports".into()
}
fn default_filler_title() -> String {
    "Signed Off".into()
}
fn default_title_lang() -> String {
    "en".into()
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            category: default_category_selector(),
            title: default_title_selector(),
            time_labels: default_time_labels_selector(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            selectors: SelectorSettings::default(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            event_duration_hours: default_event_duration_hours(),
            end_hour: default_end_hour(),
            max_channels: default_max_channels(),
            max_days_ahead: default_max_days_ahead(),
        }
    }
}

impl ScheduleSettings {
    /// Event length rounded to whole minutes. Saturates for lengths chrono
    /// cannot represent.
    pub fn event_duration(&self) -> Duration {
        Duration::try_minutes((self.event_duration_hours * 60.0).round() as i64)
            .unwrap_or(Duration::MAX)
    }

    /// Future horizon as a duration.
    pub fn horizon(&self) -> Duration {
        Duration::days(i64::from(self.max_days_ahead))
    }
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            default_title: default_title(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            epg_path: default_epg_path(),
            listing_path: default_listing_path(),
            channel_id_prefix: default_channel_id_prefix(),
            channel_name_prefix: default_channel_name_prefix(),
            filler_title: default_filler_title(),
            title_lang: default_title_lang(),
        }
    }
}

/// Returns `$SPORTSGUIDE_HOME` or `~/.config/sportsguide/`.
///
/// # Errors
/// Returns an error if neither the override nor a home directory is available.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".config").join("sportsguide"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                continue;
            }

            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(n) if n.is_f64() => value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("not a leaf value".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// See [`config_dir`].
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from `path`, writing defaults there when absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed or is invalid,
    /// or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        };

        let hours = self.schedule.event_duration_hours;
        if !hours.is_finite() || hours * 60.0 < 1.0 {
            return Err(invalid(
                "schedule.event_duration_hours",
                "must be at least one minute",
            ));
        }
        if hours > MAX_EVENT_DURATION_HOURS {
            return Err(invalid(
                "schedule.event_duration_hours",
                "must be at most 168 (one week)",
            ));
        }
        if self.schedule.max_days_ahead > MAX_DAYS_AHEAD {
            return Err(invalid("schedule.max_days_ahead", "must be at most 366"));
        }
        if self.schedule.end_hour > 23 {
            return Err(invalid("schedule.end_hour", "must be between 0 and 23"));
        }
        if self.schedule.max_channels == 0 {
            return Err(invalid("schedule.max_channels", "must be at least 1"));
        }
        if self.source.timeout_secs == 0 {
            return Err(invalid("source.timeout_secs", "must be at least 1"));
        }
        url::Url::parse(&self.source.url)
            .map_err(|e| invalid("source.url", &e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The result is validated
    /// before it replaces `self`; nothing is written to disk.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
