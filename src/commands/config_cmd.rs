//! Implementation of the `statarun config` commands.
//!
//! `show` reports the config file together with the settings a `run` would
//! resolve from it right now, so a missing value is visible before Stata is
//! ever started.

use crate::cli::ConfigAction;
use serde::Serialize;
use statarun::config::Config;
use statarun::error::{Result, StataError};
use statarun::settings::{EnvSnapshot, Overrides, Settings};
use std::path::{Path, PathBuf};

pub fn dispatch(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    let env = EnvSnapshot::from_process();
    match action {
        ConfigAction::Show { json } => cmd_show(config_path, &env, json),
        ConfigAction::Path => cmd_path(config_path, &env),
        ConfigAction::Set { key, value } => cmd_edit(config_path, &env, |config| {
            config.set(&key, &value)?;
            Ok(format!("Set {} = {}", key, value))
        }),
        ConfigAction::Unset { key } => cmd_edit(config_path, &env, |config| {
            config.unset(&key)?;
            Ok(format!("Unset {}", key))
        }),
    }
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    path: Option<PathBuf>,
    exists: bool,
    config: Config,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings_error: Option<String>,
}

fn build_report(config_path: Option<&Path>, env: &EnvSnapshot) -> Result<ConfigReport> {
    let (path, config) = super::load_config(config_path, env)?;
    let exists = path.as_deref().is_some_and(Path::exists);
    let (settings, settings_error) = match Settings::resolve(&Overrides::default(), env, &config) {
        Ok(settings) => (Some(settings), None),
        Err(err) => (None, Some(err.to_string())),
    };
    Ok(ConfigReport {
        path,
        exists,
        config,
        settings,
        settings_error,
    })
}

fn cmd_show(config_path: Option<&Path>, env: &EnvSnapshot, json: bool) -> Result<()> {
    let report = build_report(config_path, env)?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| StataError::Io(format!("failed to serialize report: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    match &report.path {
        Some(path) if report.exists => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not created yet)", path.display()),
        None => println!("Config file: none (no config directory found)"),
    }
    println!();
    println!("Persisted options:");
    if report.config == Config::default() {
        println!("  (none)");
    } else {
        for line in report.config.to_yaml()?.lines() {
            println!("  {}", line);
        }
    }
    println!();
    match (&report.settings, &report.settings_error) {
        (Some(settings), _) => {
            println!("Resolved settings:");
            println!("  stata_path:    {}", settings.stata_path.display());
            println!("  stata_version: {}", settings.stata_version);
            println!("  echo:          {}", settings.echo);
            println!("  serializer:    {}", settings.serializer);
            println!(
                "  extra_args:    {}",
                shell_words::join(&settings.extra_args)
            );
        }
        (None, Some(err)) => println!("Settings do not resolve: {}", err),
        (None, None) => {}
    }
    Ok(())
}

fn cmd_path(config_path: Option<&Path>, env: &EnvSnapshot) -> Result<()> {
    println!("{}", require_location(config_path, env)?.display());
    Ok(())
}

fn cmd_edit(
    config_path: Option<&Path>,
    env: &EnvSnapshot,
    edit: impl FnOnce(&mut Config) -> Result<String>,
) -> Result<()> {
    let path = require_location(config_path, env)?;
    let mut config = Config::load(&path)?;
    let message = edit(&mut config)?;
    config.save(&path)?;
    println!("{} in {}", message, path.display());
    Ok(())
}

fn require_location(config_path: Option<&Path>, env: &EnvSnapshot) -> Result<PathBuf> {
    Config::locate(config_path, env).ok_or_else(|| {
        StataError::InvalidArgument(
            "no config location: no home directory found. \
             Pass --config <FILE> or set STATARUN_CONFIG."
                .to_string(),
        )
    })
}
