//! # Delete Operations
//!
//! This module removes the targets of a cleanup profile from disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    cleaner::profile::{CleanupTarget, Scope, TargetKind},
    errors::CleanerError,
};

/// Deletes every target found under `root`.
///
/// Directories are removed along with all their contents. Targets that do
/// not exist, or exist with the wrong kind, are skipped. Nothing outside the
/// listed targets is touched.
///
/// # Arguments
///
/// - `root` - The directory the targets are relative to.
/// - `targets` - The entries to delete.
///
/// # Returns
///
/// The paths that were removed, or a [`CleanerError`] if listing a directory
/// or removing an entry fails.
pub fn delete_targets(root: &Path, targets: &[CleanupTarget]) -> Result<Vec<PathBuf>, CleanerError> {
    let mut removed = Vec::new();

    for target in targets {
        let locations = match &target.scope {
            Scope::Root => vec![root.to_path_buf()],
            Scope::EachSubdirectory(parent) => subdirectories(&root.join(parent))?,
        };

        for location in locations {
            let path = location.join(&target.path);
            if delete_entry(&path, target.kind)? {
                removed.push(path);
            }
        }
    }

    Ok(removed)
}

/// Removes a single entry if it exists with the expected kind.
///
/// Returns `true` if something was deleted.
fn delete_entry(path: &Path, kind: TargetKind) -> Result<bool, CleanerError> {
    let result = match kind {
        TargetKind::Directory if path.is_dir() => fs::remove_dir_all(path),
        TargetKind::File if path.is_file() => fs::remove_file(path),
        _ => return Ok(false),
    };

    result.map_err(|error| CleanerError::IoDelete {
        path: path.to_path_buf(),
        error,
    })?;
    log::info!("Deleted '{}'", path.display());
    Ok(true)
}

/// Lists the immediate subdirectories of `directory`.
///
/// A missing directory has no subdirectories.
fn subdirectories(directory: &Path) -> Result<Vec<PathBuf>, CleanerError> {
    if !directory.is_dir() {
        log::debug!("Skipping missing directory '{}'", directory.display());
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|error| CleanerError::IoRead {
            path: directory.to_path_buf(),
            error: error.into(),
        })?;
        if entry.file_type().is_dir() {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cleaner::profile::CleanupProfile;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_deletes_only_listed_targets() {
        let root = tempfile::tempdir().unwrap();
        let root = root.path();
        touch(&root.join("lib/libsuperlu.a"));
        touch(&root.join("MATLAB/superlu.m"));
        touch(&root.join("Makefile"));
        touch(&root.join("SRC/sgstrf.c"));
        touch(&root.join("README"));

        let profiles = CleanupProfile::builtin();
        let profile = &profiles[0];
        let removed = delete_targets(root, &profile.targets).unwrap();

        assert_eq!(removed.len(), 3);
        assert!(!root.join("lib").exists());
        assert!(!root.join("MATLAB").exists());
        assert!(!root.join("Makefile").exists());
        assert!(root.join("SRC/sgstrf.c").exists());
        assert!(root.join("README").exists());
    }

    #[test]
    fn test_missing_targets_succeed() {
        let root = tempfile::tempdir().unwrap();
        let profiles = CleanupProfile::builtin();
        let profile = &profiles[0];
        let removed = delete_targets(root.path(), &profile.targets).unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn test_kind_mismatch_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let root = root.path();
        // A directory named like a file target and a file named like a
        // directory target are both left alone.
        fs::create_dir_all(root.join("Makefile")).unwrap();
        touch(&root.join("cmake"));

        let profiles = CleanupProfile::builtin();
        let profile = &profiles[0];
        let removed = delete_targets(root, &profile.targets).unwrap();

        assert!(removed.is_empty());
        assert!(root.join("Makefile").is_dir());
        assert!(root.join("cmake").is_file());
    }

    #[test]
    fn test_each_subdirectory_scope() {
        let root = tempfile::tempdir().unwrap();
        let root = root.path();
        touch(&root.join("shared/superlu/Debug/superlu.obj"));
        touch(&root.join("shared/superlu/Source.c"));
        touch(&root.join("static/superlu/x64/Release/superlu.lib"));
        touch(&root.join("static/Debug"));

        let profiles = CleanupProfile::builtin();
        let profile = &profiles[2];
        let removed = delete_targets(root, &profile.targets).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!root.join("shared/superlu/Debug").exists());
        assert!(root.join("shared/superlu/Source.c").exists());
        assert!(!root.join("static/superlu/x64").exists());
        // `static/Debug` is a file directly under `static`, not a target.
        assert!(root.join("static/Debug").exists());
    }

    #[test]
    fn test_docs_scope_uses_profile_root() {
        let root = tempfile::tempdir().unwrap();
        let root = root.path();
        touch(&root.join("SRC/Doc/index.html"));
        touch(&root.join("Doc/ug.pdf"));

        let profiles = CleanupProfile::builtin();
        let profile = &profiles[1];
        let removed = delete_targets(root, &profile.targets).unwrap();

        assert_eq!(removed, vec![root.join("SRC").join("Doc")]);
        assert!(root.join("Doc/ug.pdf").exists());
    }
}
