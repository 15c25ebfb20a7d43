//! Execution settings resolution.
//!
//! Every setting resolves with the same fixed precedence:
//!
//! 1. explicit argument (`Overrides`)
//! 2. environment variable (`EnvSnapshot`)
//! 3. persisted option (`Config`)
//! 4. built-in default, or `MissingConfiguration` when there is none
//!
//! Resolution is a pure function of those three inputs. Only
//! [`EnvSnapshot::from_process`] and [`Config::load`] touch process state.

mod env;


pub use env::{ENV_PREFIX, EnvSnapshot};

use crate::config::{Config, Serializer};
use crate::driver::Platform;
use crate::error::{Result, StataError};
use serde::Serialize;
use std::path::PathBuf;

/// A resolvable setting, with the names it goes by in each source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    StataPath,
    StataVersion,
    Echo,
    Serializer,
    ExtraArgs,
}

impl Param {
    /// Human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Param::StataPath => "Stata executable path",
            Param::StataVersion => "Stata version",
            Param::Echo => "echo flag",
            Param::Serializer => "serializer",
            Param::ExtraArgs => "extra Stata arguments",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            Param::StataPath => "STATARUN_STATA_PATH",
            Param::StataVersion => "STATARUN_STATA_VERSION",
            Param::Echo => "STATARUN_ECHO",
            Param::Serializer => "STATARUN_SERIALIZER",
            Param::ExtraArgs => "STATARUN_STATA_ARGS",
        }
    }

    pub fn config_key(&self) -> &'static str {
        match self {
            Param::StataPath => "stata_path",
            Param::StataVersion => "stata_version",
            Param::Echo => "echo",
            Param::Serializer => "serializer",
            Param::ExtraArgs => "extra_args",
        }
    }

    fn missing(&self) -> StataError {
        StataError::MissingConfiguration {
            name: self.name(),
            env_var: self.env_var(),
            key: self.config_key(),
        }
    }
}

/// Values supplied explicitly by the caller. `None` defers to the next source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub stata_path: Option<PathBuf>,
    pub stata_version: Option<u32>,
    pub echo: Option<bool>,
    pub serializer: Option<Serializer>,
    pub extra_args: Option<Vec<String>>,
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub stata_path: PathBuf,
    pub stata_version: u32,
    pub echo: bool,
    pub serializer: Serializer,
    pub extra_args: Vec<String>,
    pub platform: Platform,
}

impl Settings {
    /// Settings with every optional value at its default, for the host platform.
    pub fn new(stata_path: impl Into<PathBuf>, stata_version: u32) -> Self {
        Self {
            stata_path: stata_path.into(),
            stata_version,
            echo: true,
            serializer: Serializer::default(),
            extra_args: Vec::new(),
            platform: Platform::host(),
        }
    }

    /// Resolve every setting from explicit overrides, environment, and config.
    pub fn resolve(overrides: &Overrides, env: &EnvSnapshot, config: &Config) -> Result<Self> {
        let stata_path = pick(
            Param::StataPath,
            overrides.stata_path.clone(),
            env,
            config.stata_path.as_ref().map(PathBuf::from),
            |raw, _| Ok(PathBuf::from(raw)),
        )?
        .ok_or_else(|| Param::StataPath.missing())?;

        let stata_version = resolve_stata_version(overrides.stata_version, env, config)?;

        let echo = pick(Param::Echo, overrides.echo, env, config.echo, parse_bool)?
            .unwrap_or(true);

        let serializer = pick(
            Param::Serializer,
            overrides.serializer,
            env,
            config.serializer,
            parse_serializer,
        )?
        .unwrap_or_default();

        let persisted_args = (!config.extra_args.is_empty()).then(|| config.extra_args.clone());
        let extra_args = pick(
            Param::ExtraArgs,
            overrides.extra_args.clone(),
            env,
            persisted_args,
            parse_args,
        )?
        .unwrap_or_default();

        Ok(Self {
            stata_path,
            stata_version,
            echo,
            serializer,
            extra_args,
            platform: Platform::host(),
        })
    }
}

/// Resolve only the Stata version, for callers that never launch Stata.
pub fn resolve_stata_version(
    explicit: Option<u32>,
    env: &EnvSnapshot,
    config: &Config,
) -> Result<u32> {
    let version = pick(
        Param::StataVersion,
        explicit,
        env,
        config.stata_version,
        parse_version,
    )?
    .ok_or_else(|| Param::StataVersion.missing())?;
    if version == 0 {
        return Err(StataError::InvalidArgument(
            "Stata version must be greater than 0".to_string(),
        ));
    }
    Ok(version)
}

/// Apply the precedence chain for one parameter.
///
/// Environment values are parsed with `parse`; the second argument passed to
/// it describes where the raw value came from.
fn pick<T>(
    param: Param,
    explicit: Option<T>,
    env: &EnvSnapshot,
    persisted: Option<T>,
    parse: impl Fn(&str, &str) -> Result<T>,
) -> Result<Option<T>> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    if let Some(raw) = env.get(param.env_var()) {
        let source = format!("environment variable {}", param.env_var());
        return parse(raw, &source).map(Some);
    }
    Ok(persisted)
}

/// Parse a Stata release number such as `17` or `14.2` (minor part dropped).
pub fn parse_version(raw: &str, source: &str) -> Result<u32> {
    let raw = raw.trim();
    let invalid = || {
        StataError::InvalidArgument(format!(
            "{} must be a positive Stata version number, got '{}'",
            source, raw
        ))
    };

    let major = raw.split_once('.').map_or(raw, |(major, minor)| {
        if minor.chars().all(|c| c.is_ascii_digit()) {
            major
        } else {
            raw
        }
    });
    match major.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid()),
    }
}

/// Parse a boolean flag: `true/false`, `yes/no`, `1/0`, `on/off`.
pub fn parse_bool(raw: &str, source: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(StataError::InvalidArgument(format!(
            "{} must be a boolean (true/false), got '{}'",
            source, raw
        ))),
    }
}

pub fn parse_serializer(raw: &str, source: &str) -> Result<Serializer> {
    Serializer::from_str(raw.trim()).ok_or_else(|| {
        StataError::InvalidArgument(format!(
            "{} must be 'primary' or 'legacy-secondary', got '{}'",
            source, raw
        ))
    })
}

fn parse_args(raw: &str, source: &str) -> Result<Vec<String>> {
    shell_words::split(raw).map_err(|e| {
        StataError::InvalidArgument(format!("failed to parse {} '{}': {}", source, raw, e))
    })
}
