//! Interpreter subprocess executor.
//!
//! Runs Stata against a do-file with stdout and stderr captured into one log
//! file, and waits for it to exit. The exit code is reported but never treated
//! as failure: caller errors are already contained by the do-file's
//! `capture noisily` block and show up in the log.

use super::platform::Platform;
use crate::error::{Result, StataError};
use crate::fs::TransientFiles;
use crate::settings::Settings;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Launches the interpreter for one session.
#[derive(Debug, Clone)]
pub struct ProcessDriver {
    stata_path: PathBuf,
    extra_args: Vec<String>,
    platform: Platform,
    working_dir: PathBuf,
}

/// Result of one interpreter run.
#[derive(Debug, Clone)]
pub struct Execution {
    /// Exit code of the process (None if terminated by a signal).
    pub exit_code: Option<i32>,
    /// Redirected stdout + stderr.
    pub stream_log: PathBuf,
    /// Log written by Windows batch mode, if the platform produces one.
    pub batch_log: Option<PathBuf>,
    pub duration: Duration,
}

impl ProcessDriver {
    pub fn new(settings: &Settings, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            stata_path: settings.stata_path.clone(),
            extra_args: settings.extra_args.clone(),
            platform: settings.platform,
            working_dir: working_dir.into(),
        }
    }

    /// Arguments after the executable: extra args, batch flag, `do`, script.
    pub fn arguments(&self, script: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        if let Some(flag) = self.platform.batch_flag() {
            args.push(flag.into());
        }
        args.push("do".into());
        args.push(script.as_os_str().to_os_string());
        args
    }

    /// Run the interpreter on `script` and block until it exits.
    ///
    /// The stream log, and on Windows the batch log, are registered in `files`
    /// before the process starts, so they are released on every path.
    pub fn launch(&self, script: &Path, files: &mut TransientFiles) -> Result<Execution> {
        let stream_log = files.allocate(".out.log");
        let batch_log = self.platform.batch_log_path(&self.working_dir, script);
        if let Some(path) = &batch_log {
            files.track(path.clone());
        }

        let stdout_file = std::fs::File::create(&stream_log).map_err(|e| {
            StataError::Io(format!(
                "failed to create output log '{}': {}",
                stream_log.display(),
                e
            ))
        })?;
        let stderr_file = stdout_file.try_clone().map_err(|e| {
            StataError::Io(format!(
                "failed to share output log '{}' with stderr: {}",
                stream_log.display(),
                e
            ))
        })?;

        let args = self.arguments(script);
        let command_str = describe(&self.stata_path, &args);

        let mut command = Command::new(&self.stata_path);
        command
            .args(&args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::from(stderr_file));

        tracing::info!(command = %command_str, "launching Stata");
        let start_time = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            StataError::ExecutionFailed(format!(
                "failed to start '{}': {}\n\
                 Fix: check the Stata executable path (STATARUN_STATA_PATH or `statarun config set stata_path`).",
                self.stata_path.display(),
                e
            ))
        })?;

        let status = child.wait().map_err(|e| {
            StataError::ExecutionFailed(format!(
                "failed to wait for '{}': {}",
                self.stata_path.display(),
                e
            ))
        })?;
        let duration = start_time.elapsed();

        match status.code() {
            Some(0) => tracing::info!(command = %command_str, ?duration, "Stata exited"),
            code => {
                tracing::warn!(command = %command_str, ?code, ?duration, "Stata exited abnormally")
            }
        }

        Ok(Execution {
            exit_code: status.code(),
            stream_log,
            batch_log,
            duration,
        })
    }
}

impl Execution {
    pub fn is_clean_exit(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Lines of the authoritative log.
    ///
    /// That is the batch log where the platform writes one, otherwise the
    /// redirected output stream. A missing log yields no lines.
    pub fn capture_log(&self) -> Result<Vec<String>> {
        let path = self.batch_log.as_ref().unwrap_or(&self.stream_log);
        read_log_lines(path)
    }
}

fn read_log_lines(path: &Path) -> Result<Vec<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Stata log was not written");
            Ok(Vec::new())
        }
        Err(e) => Err(StataError::Io(format!(
            "failed to read Stata log '{}': {}",
            path.display(),
            e
        ))),
    }
}

fn describe(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|s| shell_words::quote(&s.to_string_lossy()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
