//! Implementation of the `statarun run` command.
//!
//! Datasets cross the CLI as `.dta` files, so the codec is a plain file
//! pass-through: `--data-in` is copied into the session and the saved
//! output is moved to `--data-out`.

use crate::cli::RunArgs;
use statarun::codec::{CodecSet, DtaFileCodec};
use statarun::error::{Result, StataError};
use statarun::session::{self, RunRequest};
use statarun::settings::{
    EnvSnapshot, Overrides, Settings, parse_bool, parse_serializer, parse_version,
};
use statarun::source::CommandSource;
use std::io::Write;
use std::path::Path;

pub fn cmd_run(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let env = EnvSnapshot::from_process();
    let (_, config) = super::load_config(config_path, &env)?;
    let settings = Settings::resolve(&overrides(&args)?, &env, &config)?;

    if let Some(input) = &args.data_in
        && !input.is_file()
    {
        return Err(StataError::InvalidArgument(format!(
            "input dataset '{}' does not exist",
            input.display()
        )));
    }

    let source = CommandSource::from_values(args.commands)?;
    let mut request = RunRequest::new(source).with_legacy_save(args.legacy_save);
    if let Some(input) = args.data_in {
        request = request.with_input(input);
    }
    if args.data_out.is_some() {
        request = request.with_output();
    }
    if let Some(dir) = args.workdir {
        request = request.with_working_dir(dir);
    }

    let codec = match &args.data_out {
        Some(path) => DtaFileCodec::with_destination(path),
        None => DtaFileCodec::new(),
    };
    let outcome = session::run(request, &settings, &CodecSet::uniform(codec))?;

    if let Some(lines) = outcome.output {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            writeln!(out, "{}", line)
                .map_err(|e| StataError::Io(format!("failed to write output: {}", e)))?;
        }
    }
    if let Some(path) = outcome.table {
        tracing::info!(path = %path.display(), "output dataset written");
    }

    Ok(())
}

fn overrides(args: &RunArgs) -> Result<Overrides> {
    Ok(Overrides {
        stata_path: args.stata_path.clone(),
        stata_version: args
            .stata_version
            .as_deref()
            .map(|raw| parse_version(raw, "--stata-version"))
            .transpose()?,
        echo: args
            .echo
            .as_deref()
            .map(|raw| parse_bool(raw, "--echo"))
            .transpose()?,
        serializer: args
            .serializer
            .as_deref()
            .map(|raw| parse_serializer(raw, "--serializer"))
            .transpose()?,
        extra_args: None,
    })
}
