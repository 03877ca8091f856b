//! # Cleaner
//!
//! This module deletes build artifacts and vendored sources that are not
//! needed by the Visual Studio build, one profile at a time.

mod delete;
pub mod profile;

use colored::Colorize;

pub use delete::delete_targets;
pub use profile::{CleanupProfile, CleanupTarget, Scope, TargetKind};

use crate::{cli::CleanAction, errors::CleanerError, paths::PathResolver};

/// Runs the cleanup task.
///
/// Without any action, the `default` profile is run. Actions are processed
/// in order.
///
/// # Arguments
///
/// - `actions` - The flags given after `clean`.
/// - `profiles` - The configured cleanup profiles.
/// - `paths` - Resolves the profile roots.
///
/// # Returns
///
/// Returns `Ok(())` on success, or a [`CleanerError`] if a deletion fails.
/// Missing profile roots and unknown profile names only print a warning.
pub fn run(
    actions: &[CleanAction],
    profiles: &[CleanupProfile],
    paths: &PathResolver,
) -> Result<(), CleanerError> {
    println!("Running cleanup task ...");

    let default_action = [CleanAction::Profile("default".to_string())];
    let actions = if actions.is_empty() {
        &default_action[..]
    } else {
        actions
    };

    for action in actions {
        match action {
            CleanAction::All => {
                for profile in profiles {
                    run_profile(profile, paths)?;
                }
            }
            CleanAction::Profile(name) => match profiles.iter().find(|p| &p.name == name) {
                Some(profile) => run_profile(profile, paths)?,
                None => println!("{}", format!("Unknown cleanup profile: {name}").red()),
            },
        }
    }

    Ok(())
}

/// Deletes the targets of a single profile.
///
/// The profile is skipped if its root directory does not exist.
fn run_profile(profile: &CleanupProfile, paths: &PathResolver) -> Result<(), CleanerError> {
    println!("Running clean -{} ...", profile.name);

    let Some(root) = paths.try_resolve(Some(&profile.root)) else {
        return Ok(());
    };

    let removed = delete_targets(&root, &profile.targets)?;
    log::debug!(
        "Profile '{}' removed {} entries from '{}'",
        profile.name,
        removed.len(),
        root.display()
    );
    Ok(())
}
