//! # CLI
//!
//! This module defines the data structures used to parse command line
//! arguments when running the program.
//!
//! Task flags are written with a single dash, e.g. `mgmt update -download`.
//! They are matched case-insensitively and may also be given with two
//! dashes or none.

use std::{ffi::OsString, path::PathBuf};

use clap::{Parser, Subcommand};

/// Task names and aliases, in lowercase.
const TASK_NAMES: [&str; 4] = ["clean", "c", "update", "u"];

/// This struct represents the top-level CLI entry point for the tool.
#[derive(Parser, Debug)]
#[command(
    name = "mgmt",
    about = "Maintains the vendored SuperLU source tree",
    long_about = None
)]
pub struct Cli {
    /// Base directory of the tree; defaults to the parent of the current
    /// directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// JSON file overriding the update source and cleanup profiles.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parses the process arguments, exiting on error like [`Parser::parse`].
    pub fn parse_tasks() -> Cli {
        Cli::try_parse_tasks(std::env::args_os()).unwrap_or_else(|error| error.exit())
    }

    /// Parses `args`, matching task names case-insensitively.
    ///
    /// `mgmt Update -check` runs the `update` task. Names that are not a task
    /// in any case stay [`Commands::Unknown`].
    pub fn try_parse_tasks<I, T>(args: I) -> Result<Cli, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cli = Cli::try_parse_from(args)?;

        if let Some(Commands::Unknown(args)) = &cli.command {
            if let Some((task, rest)) = args.split_first() {
                let task = task.to_lowercase();
                if TASK_NAMES.contains(&task.as_str()) {
                    let args = ["mgmt".to_string(), task]
                        .into_iter()
                        .chain(rest.iter().cloned());
                    cli.command = Cli::try_parse_from(args)?.command;
                }
            }
        }

        Ok(cli)
    }
}

/// This enum represents the different tasks available.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deletes build artifacts and unneeded vendored sources.
    #[command(visible_alias = "c")]
    Clean {
        /// `-default`, `-docs`, `-build` or `-all`; defaults to `-default`.
        #[arg(
            value_name = "FLAGS",
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_parser = parse_clean_action
        )]
        actions: Vec<CleanAction>,
    },

    /// Checks for, and optionally downloads, a new SuperLU release.
    #[command(visible_alias = "u")]
    Update {
        /// `-check` or `-download`; defaults to `-check`.
        #[arg(
            value_name = "FLAGS",
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_parser = parse_update_action
        )]
        actions: Vec<UpdateAction>,
    },

    /// Any other task name.
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

/// A flag of the `clean` task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanAction {
    /// Run every configured profile.
    All,
    /// Run the named profile.
    Profile(String),
}

/// A flag of the `update` task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Print the installed and latest versions.
    Check,
    /// Download the latest release.
    Download,
    /// Any other flag; reported and skipped.
    Unknown(String),
}

/// Strips leading dashes and lowercases a task flag.
fn normalize_flag(flag: &str) -> String {
    flag.trim_start_matches('-').to_lowercase()
}

fn parse_clean_action(flag: &str) -> Result<CleanAction, String> {
    match normalize_flag(flag).as_str() {
        "" => Err(format!("invalid clean flag '{flag}'")),
        "all" => Ok(CleanAction::All),
        name => Ok(CleanAction::Profile(name.to_string())),
    }
}

fn parse_update_action(flag: &str) -> Result<UpdateAction, String> {
    match normalize_flag(flag).as_str() {
        "check" => Ok(UpdateAction::Check),
        "download" => Ok(UpdateAction::Download),
        _ => Ok(UpdateAction::Unknown(flag.to_string())),
    }
}
