//! Configuration loading and representation.
//!
//! Every setting has a default; environment variables override it. Values
//! that are present but unparsable are an error rather than silently ignored.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use foodwise_inventory::DEFAULT_EXPIRING_THRESHOLD_DAYS;
use foodwise_observability::LogFormat;

use crate::store::STORAGE_KEY;

pub const ENV_STORE_PATH: &str = "FOODWISE_STORE_PATH";
pub const ENV_EXPIRING_THRESHOLD_DAYS: &str = "FOODWISE_EXPIRING_THRESHOLD_DAYS";
pub const ENV_RESCAN_INTERVAL_SECS: &str = "FOODWISE_RESCAN_INTERVAL_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "FOODWISE_POLL_INTERVAL_MS";
pub const ENV_LOG_FORMAT: &str = "FOODWISE_LOG_FORMAT";

pub const DEFAULT_RESCAN_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("could not resolve an app data directory; set {ENV_STORE_PATH}")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodwiseConfig {
    /// JSON file holding the saved inventory.
    pub store_path: PathBuf,
    /// Day window for the expiring-soon set.
    pub expiring_threshold_days: i64,
    /// Periodic rescan interval of the expiry watcher.
    pub rescan_interval: Duration,
    /// How often the watcher checks for writes by other processes.
    pub poll_interval: Duration,
    pub log_format: LogFormat,
}

impl FoodwiseConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup (tests, embedding).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_path = match non_empty(&lookup, ENV_STORE_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_store_path()?,
        };

        let expiring_threshold_days = parse_var(&lookup, ENV_EXPIRING_THRESHOLD_DAYS)?
            .unwrap_or(DEFAULT_EXPIRING_THRESHOLD_DAYS);
        if expiring_threshold_days < 0 {
            return Err(invalid(
                ENV_EXPIRING_THRESHOLD_DAYS,
                expiring_threshold_days.to_string(),
                "must not be negative",
            ));
        }

        let rescan_interval = parse_var::<u64, _>(&lookup, ENV_RESCAN_INTERVAL_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RESCAN_INTERVAL);
        let poll_interval = parse_var::<u64, _>(&lookup, ENV_POLL_INTERVAL_MS)?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        if rescan_interval.is_zero() || poll_interval.is_zero() {
            return Err(invalid(
                if rescan_interval.is_zero() {
                    ENV_RESCAN_INTERVAL_SECS
                } else {
                    ENV_POLL_INTERVAL_MS
                },
                "0".to_string(),
                "interval must be positive",
            ));
        }

        let log_format = parse_var(&lookup, ENV_LOG_FORMAT)?.unwrap_or_default();

        Ok(Self {
            store_path,
            expiring_threshold_days,
            rescan_interval,
            poll_interval,
            log_format,
        })
    }
}

/// `{app_data_dir}/foodwise/foodwise_items.json`.
///
/// Falls back to `~/.local/share` when the OS reports no data directory.
pub fn default_store_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;

    path.push("foodwise");
    path.push(format!("{STORAGE_KEY}.json"));
    Ok(path)
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).filter(|v| !v.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(var, raw.clone(), e.to_string())),
    }
}

fn invalid(var: &'static str, value: String, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value,
        reason: reason.into(),
    }
}
