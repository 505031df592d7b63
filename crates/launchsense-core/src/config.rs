//! TOML-based engine configuration.
//!
//! Stores tunables including:
//! - Updater timing (debounce window, immediate-update threshold)
//! - Channel capacities for the updater service
//! - Extra classification keywords per semantic bucket
//! - Default log filter
//!
//! Configuration is stored at `~/.config/launchsense/config.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{BucketTable, SemanticBucket};
use crate::error::ConfigError;

/// Returns `~/.config/launchsense[-dev]/` based on LAUNCHSENSE_ENV.
///
/// Set LAUNCHSENSE_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LAUNCHSENSE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("launchsense-dev")
    } else {
        base_dir.join("launchsense")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Incremental updater timing and queue sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Delay before a debounced batch is applied
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Batches arriving later than this after the last update apply at once
    #[serde(default = "default_immediate_after_ms")]
    pub immediate_after_ms: u64,
    #[serde(default = "default_emission_capacity")]
    pub emission_capacity: usize,
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,
}

/// Classification table extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// bucket name -> keywords appended to the built-in table
    #[serde(default)]
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when LAUNCHSENSE_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/launchsense/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub updater: UpdaterConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_debounce_ms() -> u64 {
    150
}
fn default_immediate_after_ms() -> u64 {
    2000
}
fn default_emission_capacity() -> usize {
    32
}
fn default_command_capacity() -> usize {
    64
}
fn default_log_filter() -> String {
    "launchsense=info".into()
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            immediate_after_ms: default_immediate_after_ms(),
            emission_capacity: default_emission_capacity(),
            command_capacity: default_command_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl ClassificationConfig {
    /// Parse bucket names into a keyword map.
    pub fn extra_keywords_by_bucket(
        &self,
    ) -> Result<BTreeMap<SemanticBucket, Vec<String>>, ConfigError> {
        self.extra_keywords
            .iter()
            .map(|(name, keywords)| {
                let bucket = name.parse::<SemanticBucket>().map_err(|e| {
                    ConfigError::InvalidValue {
                        key: format!("classification.extra_keywords.{name}"),
                        message: e.to_string(),
                    }
                })?;
                Ok((bucket, keywords.clone()))
            })
            .collect()
    }

    /// Built-in table extended with the configured keywords.
    pub fn bucket_table(&self) -> Result<Arc<BucketTable>, ConfigError> {
        let extra = self.extra_keywords_by_bucket()?;
        Ok(Arc::new(BucketTable::default().with_extra_keywords(&extra)))
    }
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.updater.debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "updater.debounce_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.updater.immediate_after_ms < self.updater.debounce_ms {
            return Err(ConfigError::InvalidValue {
                key: "updater.immediate_after_ms".into(),
                message: format!(
                    "must be at least updater.debounce_ms ({})",
                    self.updater.debounce_ms
                ),
            });
        }
        for (key, capacity) in [
            ("updater.emission_capacity", self.updater.emission_capacity),
            ("updater.command_capacity", self.updater.command_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        self.classification.extra_keywords_by_bucket()?;
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

    /// Set a value by dot-separated key in memory and validate the result.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value and persist to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }
}
