//! Implementation of the `statarun script` command.

use crate::cli::ScriptArgs;
use statarun::error::Result;
use statarun::session::preview_script;
use statarun::settings::{EnvSnapshot, parse_version, resolve_stata_version};
use statarun::source::CommandSource;
use std::path::Path;

/// Print the do-file a run would execute. Only the Stata version is needed.
pub fn cmd_script(args: ScriptArgs, config_path: Option<&Path>) -> Result<()> {
    let explicit = args
        .stata_version
        .as_deref()
        .map(|raw| parse_version(raw, "--stata-version"))
        .transpose()?;

    let stata_version = match explicit {
        Some(version) => version,
        None => {
            let env = EnvSnapshot::from_process();
            let (_, config) = super::load_config(config_path, &env)?;
            resolve_stata_version(None, &env, &config)?
        }
    };

    let source = CommandSource::from_values(args.commands)?;
    let text = preview_script(
        &source,
        args.data_in,
        args.data_out,
        args.legacy_save,
        stata_version,
    )?;
    print!("{}", text);
    Ok(())
}
