//! Command implementations for statarun.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the config loading they share.

mod config_cmd;
mod run;
mod script;

use crate::cli::{Cli, Command};
use statarun::config::Config;
use statarun::error::Result;
use statarun::settings::EnvSnapshot;
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run(args) => run::cmd_run(args, config_path),
        Command::Script(args) => script::cmd_script(args, config_path),
        Command::Config(cmd) => config_cmd::dispatch(cmd.action, config_path),
    }
}

/// Persisted options and where they were read from.
///
/// No resolvable location (no `--config`, no `STATARUN_CONFIG`, no home
/// directory) yields an empty config.
pub(crate) fn load_config(
    explicit: Option<&Path>,
    env: &EnvSnapshot,
) -> Result<(Option<PathBuf>, Config)> {
    let path = Config::locate(explicit, env);
    let config = match &path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok((path, config))
}
