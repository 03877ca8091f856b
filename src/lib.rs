//! # SuperLU maintenance tool
//!
//! Keeps the vendored SuperLU tree tidy and up to date. The `clean` task
//! deletes files that the Visual Studio build does not use; the `update` task
//! checks the upstream project for a newer release and downloads it.

pub mod cleaner;
pub mod cli;
pub mod config;
pub mod errors;
pub mod paths;
pub mod updater;

use crate::{
    cli::{Cli, Commands},
    config::Config,
    errors::Error,
    paths::PathResolver,
};

/// Runs the task given on the command line.
///
/// Without a task, a usage hint is printed. An unknown task is reported on
/// standard output and is not an error.
pub fn run() -> Result<(), Error> {
    let cli = Cli::parse_tasks();

    let Some(command) = cli.command else {
        println!("Please specify a task to run: mgmt clean|update [args]");
        return Ok(());
    };

    let config = Config::load(cli.config.as_deref())?;
    let paths = match cli.root {
        Some(root) => PathResolver::new(root),
        None => PathResolver::from_current_dir()?,
    };
    log::debug!("Base directory: '{}'", paths.base().display());

    match command {
        Commands::Clean { actions } => cleaner::run(&actions, &config.profiles, &paths)?,
        Commands::Update { actions } => updater::run(&actions, &config.updater, &paths)?,
        Commands::Unknown(args) => {
            let task = args.first().map(String::as_str).unwrap_or_default();
            println!("Unknown task: {}", task.to_lowercase());
        }
    }

    Ok(())
}
