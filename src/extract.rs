//! Output extraction and session teardown.
//!
//! After Stata exits, the log is cut down to the lines produced by the
//! caller's commands, the output dataset (if requested) is decoded, and every
//! transient file is released. Release happens whatever the outcome of the
//! first two steps.

use crate::codec::{CodecOptions, CodecPlan, TableCodec};
use crate::driver::Execution;
use crate::error::{Result, StataError};
use crate::fs::TransientFiles;
use crate::script::Sentinel;
use std::path::PathBuf;

/// The output dataset a session expects, and how to decode it.
pub struct OutputRequest<'a, T> {
    pub path: PathBuf,
    pub plan: CodecPlan,
    pub codec: &'a dyn TableCodec<Table = T>,
    pub options: &'a CodecOptions,
}

/// What a finished session hands back.
#[derive(Debug)]
pub struct Extraction<T> {
    /// Log lines between the markers, when echo was requested.
    pub output: Option<Vec<String>>,
    pub table: Option<T>,
}

/// Lines strictly between the first two marker occurrences.
pub fn caller_output(lines: &[String], sentinel: &Sentinel) -> Result<Vec<String>> {
    let positions = sentinel.positions(lines);
    match positions.as_slice() {
        [start, end, ..] => Ok(lines[start + 1..*end].to_vec()),
        found => Err(StataError::ProtocolViolation(format!(
            "expected 2 output markers in the Stata log, found {} ({} log lines). \
             Stata may have stopped before finishing the do-file.",
            found.len(),
            lines.len()
        ))),
    }
}

/// Decode the dataset Stata saved.
pub fn collect_table<T>(request: &OutputRequest<'_, T>) -> Result<T> {
    if !request.path.is_file() {
        return Err(StataError::OutputMissing(format!(
            "Stata did not write the output dataset '{}'. \
             It probably stopped before reaching the save directive.",
            request.path.display()
        )));
    }
    request.codec.decode(
        &request.path,
        request.plan.format_revision,
        request.options,
    )
}

/// Extract echo output and the output table, then release `files`.
///
/// `sentinel` is `Some` when echo was requested.
pub fn finish<T>(
    execution: &Execution,
    sentinel: Option<&Sentinel>,
    output: Option<OutputRequest<'_, T>>,
    mut files: TransientFiles,
) -> Result<Extraction<T>> {
    let result = extract(execution, sentinel, output.as_ref());

    let failures = files.release();
    if failures > 0 {
        tracing::warn!(failures, session = %files.session_id(), "some transient files were left behind");
    }

    result
}

fn extract<T>(
    execution: &Execution,
    sentinel: Option<&Sentinel>,
    output: Option<&OutputRequest<'_, T>>,
) -> Result<Extraction<T>> {
    let echoed = match sentinel {
        Some(sentinel) => {
            let lines = execution.capture_log()?;
            Some(caller_output(&lines, sentinel)?)
        }
        None => None,
    };

    let table = output.map(collect_table).transpose()?;

    Ok(Extraction {
        output: echoed,
        table,
    })
}
