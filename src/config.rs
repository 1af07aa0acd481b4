use crate::calendar::{DEFAULT_SPAN_DAYS, window_bounds};
use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "DISPATCH_BOARD_CONFIG";
pub const PRIMARY_URL_ENV: &str = "DISPATCH_BOARD_PRIMARY_URL";
pub const FALLBACK_URL_ENV: &str = "DISPATCH_BOARD_FALLBACK_URL";

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;
/// Longest grid the board will build, one year of buckets.
pub const MAX_BUCKET_SPAN_DAYS: u32 = 366;
pub const DEFAULT_PRIMARY_URL: &str = "http://127.0.0.1:8080/schedule.json";
pub const DEFAULT_FALLBACK_URL: &str = "http://127.0.0.1:8080/schedule-fallback.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Anchor for the grid; snapped back to its Sunday. `None` means today.
    pub window_start: Option<NaiveDate>,
    pub refresh_interval_secs: u64,
    pub bucket_span_days: u32,
    pub primary_url: String,
    pub fallback_url: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            window_start: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            bucket_span_days: DEFAULT_SPAN_DAYS,
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Defaults, then the file named by `DISPATCH_BOARD_CONFIG`, then URL overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var(PRIMARY_URL_ENV) {
            config.primary_url = url;
        }
        if let Ok(url) = std::env::var(FALLBACK_URL_ENV) {
            config.fallback_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_span_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "bucket_span_days".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.bucket_span_days > MAX_BUCKET_SPAN_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "bucket_span_days".into(),
                message: format!("must be at most {MAX_BUCKET_SPAN_DAYS}"),
            });
        }
        if let Some(anchor) = self.window_start {
            if window_bounds(anchor, self.bucket_span_days).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: "window_start".into(),
                    message: format!("{anchor} is too close to the end of the calendar"),
                });
            }
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "refresh_interval_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.primary_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "primary_url".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Span in days as the board uses it, within `1..=MAX_BUCKET_SPAN_DAYS`.
    pub fn span_days(&self) -> u32 {
        self.bucket_span_days.clamp(1, MAX_BUCKET_SPAN_DAYS)
    }

    /// The anchor date, falling back to `today`.
    pub fn anchor(&self, today: NaiveDate) -> NaiveDate {
        self.window_start.unwrap_or(today)
    }
}
