//! Config loading, validation, and editing operations.

use super::model::Config;
use super::types::{CONFIG_KEYS, CONFIG_PATH_ENV, Serializer};
use crate::error::{Result, StataError};
use crate::settings::{EnvSnapshot, parse_bool, parse_version};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Per-user config file location: `<config dir>/statarun/config.yaml`.
///
/// Returns `None` when no home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|b| b.config_dir().join("statarun").join("config.yaml"))
}

impl Config {
    /// Pick the config file: explicit path, then `STATARUN_CONFIG`, then the per-user default.
    pub fn locate(explicit: Option<&Path>, env: &EnvSnapshot) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = env.get(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        default_config_path()
    }

    /// Load config from a YAML file.
    ///
    /// A file that does not exist yields an empty config: persisted options are
    /// the last fallback, never a requirement.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StataError::Io(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            StataError::InvalidArgument(msg) => {
                StataError::InvalidArgument(format!("{} (in '{}')", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            StataError::InvalidArgument(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| StataError::Io(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Write config to `path` atomically, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let yaml = self.to_yaml()?;
        crate::fs::atomic_write_file(path, &yaml)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `stata_path`, when present, must be non-empty
    /// - `stata_version`, when present, must be positive
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.stata_path
            && path.trim().is_empty()
        {
            return Err(StataError::InvalidArgument(
                "config validation failed: stata_path must not be empty".to_string(),
            ));
        }

        if self.stata_version == Some(0) {
            return Err(StataError::InvalidArgument(
                "config validation failed: stata_version must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Set one key from its command-line string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let source = format!("config key '{}'", key);
        match key {
            "stata_path" => {
                if value.trim().is_empty() {
                    return Err(StataError::InvalidArgument(
                        "stata_path must not be empty".to_string(),
                    ));
                }
                self.stata_path = Some(value.to_string());
            }
            "stata_version" => self.stata_version = Some(parse_version(value, &source)?),
            "echo" => self.echo = Some(parse_bool(value, &source)?),
            "serializer" => {
                self.serializer = Some(Serializer::from_str(value).ok_or_else(|| {
                    StataError::InvalidArgument(format!(
                        "{} must be 'primary' or 'legacy-secondary', got '{}'",
                        source, value
                    ))
                })?)
            }
            "extra_args" => {
                self.extra_args = shell_words::split(value).map_err(|e| {
                    StataError::InvalidArgument(format!(
                        "failed to parse {} '{}': {}",
                        source, value, e
                    ))
                })?
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Remove one key so it falls back to its default.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "stata_path" => self.stata_path = None,
            "stata_version" => self.stata_version = None,
            "echo" => self.echo = None,
            "serializer" => self.serializer = None,
            "extra_args" => self.extra_args.clear(),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> StataError {
    StataError::InvalidArgument(format!(
        "unknown config key '{}'. Known keys: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
