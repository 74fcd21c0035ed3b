//! Command-line argument definition and processing.

use std::path::PathBuf;

use clap::Parser;

use super::error::ArgsError;
use super::{handlers, options};
use crate::command::Environment;
use crate::config::Settings;
use crate::state::OptionMap;
use crate::validate::Validator;

/// sqlmapctl - build, validate and supervise sqlmap runs from saved option profiles
#[derive(Parser, Debug, Default)]
#[command(name = "sqlmapctl")]
#[command(version)]
#[command(about = "Build, validate and supervise sqlmap runs from saved option profiles", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Load options from a profile document (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Set an option, applied after the profile (e.g. --set url=http://host/?id=1)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Write the collected options to a profile document and exit
    #[arg(long, value_name = "FILE")]
    pub save_profile: Option<PathBuf>,

    /// Print the command that would run and exit
    #[arg(long)]
    pub preview: bool,

    /// Validate the collected options and exit
    #[arg(long)]
    pub validate: bool,

    /// Validate a raw sqlmap command line and exit
    #[arg(long, value_name = "COMMAND")]
    pub check: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Run through the elevation wrapper, prompting for its password
    #[arg(long)]
    pub sudo: bool,

    /// Do not inject --batch and --disable-coloring
    #[arg(long)]
    pub no_force: bool,

    /// Print how sqlmap was discovered on this machine and exit
    #[arg(long)]
    pub doctor: bool,

    /// Settings file (default: ~/.config/sqlmapctl/settings.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print discovery results.
    Doctor,
    /// Validate a raw command line.
    Check(String),
    /// Write the collected options to a profile document.
    SaveProfile(PathBuf),
    /// Print the built command.
    Preview,
    /// Print the options report.
    Validate,
    /// Run a scan.
    Run,
}

impl Args {
    /// What: Pick the action; the first of doctor, check, save-profile, preview, validate wins.
    ///
    /// Output:
    /// - `Action::Run` when no early-exit flag is given.
    #[must_use]
    pub fn action(&self) -> Action {
        if self.doctor {
            Action::Doctor
        } else if let Some(raw) = &self.check {
            Action::Check(raw.clone())
        } else if let Some(path) = &self.save_profile {
            Action::SaveProfile(path.clone())
        } else if self.preview {
            Action::Preview
        } else if self.validate {
            Action::Validate
        } else {
            Action::Run
        }
    }

    /// Whether forced flags apply, combining settings with `--no-force`.
    #[must_use]
    pub const fn force_required_flags(&self, settings: &Settings) -> bool {
        settings.force_required_flags && !self.no_force
    }
}

/// Result of processing early-exit flags.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// An early-exit action ran; `true` when it succeeded.
    Done(bool),
    /// No early-exit action; run a scan with these options.
    Run(OptionMap),
}

/// What: Process command-line arguments and handle early-exit actions.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
/// - `env`: Discovered tool invocation.
/// - `settings`: Loaded settings.
///
/// Output:
/// - `Dispatch::Done(success)` after printing the requested output, or
///   `Dispatch::Run(options)` when a scan should start.
///
/// # Errors
///
/// - Profile files that cannot be read or parsed, malformed or unknown `--set`
///   assignments, and JSON rendering failures.
///
/// Details:
/// - Exclusion conflicts among the collected options are printed to stderr; they do not
///   stop the action.
pub fn process_args(
    args: &Args,
    env: &Environment,
    settings: &Settings,
) -> Result<Dispatch, ArgsError> {
    let action = args.action();
    tracing::debug!(?action, json = args.json, "[Args] processing");

    let force = args.force_required_flags(settings);
    let (text, ok) = match &action {
        Action::Doctor => (handlers::doctor(env, settings, args.config.as_deref(), args.json)?, true),
        Action::Check(raw) => handlers::check(&Validator::new(env), raw, args.json)?,
        Action::SaveProfile(path) => {
            let collected = collect_with_notes(args)?;
            (handlers::save_profile(path, &collected)?, true)
        }
        Action::Preview => {
            let collected = collect_with_notes(args)?;
            (handlers::preview(env, &collected, force, args.json)?, true)
        }
        Action::Validate => {
            let collected = collect_with_notes(args)?;
            handlers::validate(&Validator::new(env), &collected, force, args.json)?
        }
        Action::Run => return Ok(Dispatch::Run(collect_with_notes(args)?)),
    };
    println!("{text}");
    Ok(Dispatch::Done(ok))
}

/// Collect options and print exclusion conflicts to stderr.
fn collect_with_notes(args: &Args) -> Result<OptionMap, ArgsError> {
    let collected = options::collect(args.profile.as_deref(), &args.set)?;
    for note in options::exclusion_notes(&collected) {
        eprintln!("warning: {note}");
    }
    Ok(collected)
}
