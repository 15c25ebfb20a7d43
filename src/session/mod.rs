//! One complete batch round-trip with Stata.
//!
//! A session runs four stages strictly in order:
//!
//! 1. resolve the command source into lines
//! 2. synthesize the do-file (and encode the input dataset)
//! 3. run Stata on it
//! 4. extract the caller's output and the output dataset, then clean up
//!
//! Everything a session writes to disk is registered in its
//! [`TransientFiles`], which is released on every exit path: explicitly at
//! the end of extraction, or by `Drop` when an earlier stage returns an error.

#[cfg(test)]
mod tests;

use crate::codec::{CodecOptions, CodecPlan, CodecSet};
use crate::config::Config;
use crate::driver::ProcessDriver;
use crate::error::{Result, StataError};
use crate::extract::{self, OutputRequest};
use crate::fs::TransientFiles;
use crate::script::{SaveDirective, ScriptPlan, Sentinel};
use crate::settings::{EnvSnapshot, Overrides, Settings};
use crate::source::CommandSource;
use std::path::PathBuf;

/// What the caller wants from one session.
#[derive(Debug, Clone)]
pub struct RunRequest<T> {
    pub commands: CommandSource,
    /// Dataset loaded into Stata before the commands run.
    pub input: Option<T>,
    /// Save the dataset in memory after the commands and return it.
    pub request_output: bool,
    /// Use `saveold` (with `version(12)` on 14+) instead of `save`.
    pub legacy_save: bool,
    pub codec_options: CodecOptions,
    /// Working directory for Stata. Defaults to the current directory.
    pub working_dir: Option<PathBuf>,
    /// Parent of the session directory. Defaults to the system temp directory.
    pub temp_root: Option<PathBuf>,
}

impl<T> RunRequest<T> {
    pub fn new(commands: CommandSource) -> Self {
        Self {
            commands,
            input: None,
            request_output: false,
            legacy_save: false,
            codec_options: CodecOptions::new(),
            working_dir: None,
            temp_root: None,
        }
    }

    pub fn with_input(mut self, table: T) -> Self {
        self.input = Some(table);
        self
    }

    pub fn with_output(mut self) -> Self {
        self.request_output = true;
        self
    }

    pub fn with_legacy_save(mut self, legacy_save: bool) -> Self {
        self.legacy_save = legacy_save;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(dir.into());
        self
    }

    pub fn with_codec_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.codec_options.insert(key.into(), value.into());
        self
    }
}

/// What one session hands back.
#[derive(Debug)]
pub struct RunOutcome<T> {
    /// Log lines produced by the caller's commands, when echo is on.
    pub output: Option<Vec<String>>,
    /// The output dataset, when it was requested.
    pub table: Option<T>,
    pub exit_code: Option<i32>,
    pub session_id: String,
}

/// Run one session with already resolved settings.
pub fn run<T>(
    request: RunRequest<T>,
    settings: &Settings,
    codecs: &CodecSet<T>,
) -> Result<RunOutcome<T>> {
    let commands = request.commands.resolve()?;
    let working_dir = resolve_working_dir(request.working_dir)?;
    let plan = CodecPlan::select(settings.stata_version, settings.serializer);
    let codec = codecs.get(plan.strategy);

    let mut files = match &request.temp_root {
        Some(root) => TransientFiles::create_in(root)?,
        None => TransientFiles::create()?,
    };
    let session_id = files.session_id().to_string();
    tracing::debug!(
        session = %session_id,
        commands = commands.len(),
        strategy = ?plan.strategy,
        format_revision = plan.format_revision,
        "session started"
    );

    let sentinel = Sentinel::generate();
    let mut script = ScriptPlan::new(commands, sentinel.clone());

    if let Some(table) = &request.input {
        let path = files.allocate("-in.dta");
        codec.encode(table, plan.format_revision, &request.codec_options, &path)?;
        script = script.with_input(path);
    }

    let output_path = request.request_output.then(|| files.allocate("-out.dta"));
    if let Some(path) = &output_path {
        let directive = SaveDirective::select(settings.stata_version, request.legacy_save);
        script = script.with_output(path.clone(), directive);
    }

    let script_path = files.allocate(".do");
    script.write_to(&script_path)?;

    let driver = ProcessDriver::new(settings, &working_dir);
    let execution = driver.launch(&script_path, &mut files)?;

    let output = output_path.map(|path| OutputRequest {
        path,
        plan,
        codec,
        options: &request.codec_options,
    });
    let extraction = extract::finish(
        &execution,
        settings.echo.then_some(&sentinel),
        output,
        files,
    )?;

    tracing::debug!(session = %session_id, "session finished");
    Ok(RunOutcome {
        output: extraction.output,
        table: extraction.table,
        exit_code: execution.exit_code,
        session_id,
    })
}

/// Resolve settings, then run. Configuration errors surface before any file is created.
pub fn run_configured<T>(
    request: RunRequest<T>,
    overrides: &Overrides,
    env: &EnvSnapshot,
    config: &Config,
    codecs: &CodecSet<T>,
) -> Result<RunOutcome<T>> {
    let settings = Settings::resolve(overrides, env, config)?;
    run(request, &settings, codecs)
}

/// Render the do-file a session would run, with placeholder dataset paths.
pub fn preview_script(
    commands: &CommandSource,
    with_input: bool,
    request_output: bool,
    legacy_save: bool,
    stata_version: u32,
) -> Result<String> {
    let mut script = ScriptPlan::new(commands.resolve()?, Sentinel::generate());
    if with_input {
        script = script.with_input(PathBuf::from("<input>.dta"));
    }
    if request_output {
        script = script.with_output(
            PathBuf::from("<output>.dta"),
            SaveDirective::select(stata_version, legacy_save),
        );
    }
    Ok(script.render())
}

fn resolve_working_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|e| {
            StataError::Io(format!("failed to determine current directory: {}", e))
        })?,
    };
    if !dir.is_dir() {
        return Err(StataError::InvalidArgument(format!(
            "working directory '{}' does not exist",
            dir.display()
        )));
    }
    Ok(dir)
}
