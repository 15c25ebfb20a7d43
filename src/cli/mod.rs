//! CLI argument parsing for statarun.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Values with their own syntax (versions, booleans, serializer names) are
//! taken as strings here and parsed in `commands`, so a bad value reports
//! the same error whether it came from a flag, the environment, or config.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// statarun: run Stata commands in batch mode and capture their output.
///
/// Commands are wrapped in a generated do-file between two unique markers;
/// only the log lines they produce are printed. Datasets can be passed in
/// and saved back out as `.dta` files.
#[derive(Parser, Debug)]
#[command(name = "statarun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to use instead of STATARUN_CONFIG or the per-user default.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log session details to stderr (overrides STATARUN_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for statarun.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run Stata commands and print the output they produce.
    ///
    /// Pass command text (one or more arguments, each may span lines) or the
    /// path of an existing do-file.
    Run(RunArgs),

    /// Print the do-file `run` would execute, without starting Stata.
    Script(ScriptArgs),

    /// Inspect or edit the persisted configuration.
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Stata command text, or the path of a do-file.
    #[arg(value_name = "COMMANDS")]
    pub commands: Vec<String>,

    /// Dataset (.dta) loaded before the commands run.
    #[arg(long, value_name = "FILE")]
    pub data_in: Option<PathBuf>,

    /// Where to write the dataset in memory after the commands.
    #[arg(long, value_name = "FILE")]
    pub data_out: Option<PathBuf>,

    /// Save with `saveold` for older Stata releases.
    #[arg(long)]
    pub legacy_save: bool,

    /// Dataset serializer: primary or legacy-secondary.
    #[arg(long)]
    pub serializer: Option<String>,

    /// Stata executable.
    #[arg(long, value_name = "PATH")]
    pub stata_path: Option<PathBuf>,

    /// Stata release number, e.g. 17.
    #[arg(long, value_name = "N")]
    pub stata_version: Option<String>,

    /// Print the commands' output (true/false).
    #[arg(long, value_name = "BOOL")]
    pub echo: Option<String>,

    /// Working directory for Stata.
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

}

#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// Stata command text, or the path of a do-file.
    #[arg(value_name = "COMMANDS")]
    pub commands: Vec<String>,

    /// Include the directive that loads an input dataset.
    #[arg(long)]
    pub data_in: bool,

    /// Include the directive that saves the output dataset.
    #[arg(long)]
    pub data_out: bool,

    #[arg(long)]
    pub legacy_save: bool,

    /// Stata release number; defaults to the configured one.
    #[arg(long, value_name = "N")]
    pub stata_version: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the config file and the settings a run would use.
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Print the config file location.
    Path,

    /// Set a persisted option.
    Set { key: String, value: String },

    /// Remove a persisted option.
    Unset { key: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
