//! TOML-based application configuration.
//!
//! Stores the countdown length, the daily rollover threshold, and the
//! tracked categories. Stored at `<data_dir>/config.toml`; a default file
//! is written on first run.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::rollover::ResetPolicy;
use crate::tally::Category;

/// Countdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Seconds the shared countdown restarts from on every press.
    #[serde(default = "default_initial_seconds")]
    pub initial_seconds: u64,
    /// Remaining seconds at which the display switches to its warning style.
    #[serde(default = "default_low_warn_seconds")]
    pub low_warn_seconds: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub rollover: ResetPolicy,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

// 1h15m.
fn default_initial_seconds() -> u64 {
    4500
}
fn default_low_warn_seconds() -> u64 {
    60
}
fn default_categories() -> Vec<Category> {
    vec![Category::new("cig", "Cig."), Category::new("weed", "Weed")]
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_seconds: default_initial_seconds(),
            low_warn_seconds: default_low_warn_seconds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            rollover: ResetPolicy::default(),
            categories: default_categories(),
        }
    }
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |node, part| match node {
        Value::Array(items) => items.get(part.parse::<usize>().ok()?),
        _ => node.get(part),
    })
}

fn lookup_mut<'a>(root: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    if key.is_empty() {
        return Some(root);
    }
    key.split('.').try_fold(root, |node, part| match node {
        Value::Array(items) => items.get_mut(part.parse::<usize>().ok()?),
        _ => node.get_mut(part),
    })
}

/// Parse `raw` into the JSON type already stored at the target.
fn coerce(existing: &Value, raw: &str, key: &str) -> Result<Value, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match existing {
        Value::Bool(_) => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid(format!("cannot parse '{raw}' as bool"))),
        Value::Number(_) => {
            if let Ok(n) = raw.parse::<u64>() {
                Ok(Value::Number(n.into()))
            } else if let Ok(n) = raw.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{raw}' as number")))
            } else {
                Err(invalid(format!("cannot parse '{raw}' as number")))
            }
        }
        Value::String(_) => Ok(Value::String(raw.to_string())),
        _ => serde_json::from_str(raw).map_err(|e| invalid(e.to_string())),
    }
}

fn store(root: &mut Value, key: &str, raw: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let (parent, leaf) = key.rsplit_once('.').unwrap_or(("", key));
    let parent_node = lookup_mut(root, parent).ok_or_else(unknown)?;
    let slot = match parent_node {
        Value::Object(map) => map.get_mut(leaf).ok_or_else(unknown)?,
        Value::Array(items) => leaf
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get_mut(i))
            .ok_or_else(unknown)?,
        _ => return Err(unknown()),
    };
    let new_value = coerce(slot, raw, key)?;
    *slot = new_value;
    Ok(())
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    /// Returns an error if an existing config file cannot be parsed or
    /// fails validation, or if the default cannot be written.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// # Errors
    /// Returns an error on an unusable countdown length, rollover time, or
    /// category list (the screen fits one or two categories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.initial_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.initial_seconds".into(),
                message: "must be positive".into(),
            });
        }
        self.rollover.validate()?;
        if self.categories.is_empty() || self.categories.len() > 2 {
            return Err(ConfigError::InvalidValue {
                key: "categories".into(),
                message: "expected one or two tracked categories".into(),
            });
        }
        for (i, category) in self.categories.iter().enumerate() {
            if category.key.is_empty() || category.key.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidValue {
                    key: "categories".into(),
                    message: format!("'{}' is not a usable category key", category.key),
                });
            }
            if self.categories[..i].iter().any(|c| c.key == category.key) {
                return Err(ConfigError::InvalidValue {
                    key: "categories".into(),
                    message: format!("duplicate category key '{}'", category.key),
                });
            }
        }
        Ok(())
    }

    /// Get a config value as a string by dot-separated key
    /// (e.g. `timer.initial_seconds`, `categories.0.label`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match lookup(&json, key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, validate, and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// into the field's type, validation fails, or the save fails.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        store(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        self.save()
    }
}
