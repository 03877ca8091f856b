//! # Installed Version
//!
//! Reads and writes the marker file recording which SuperLU release is
//! vendored.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    errors::UpdaterError,
    paths::{MARKER_FILE, MARKER_LABEL},
};

/// How many lines of the marker file are searched for the label.
const SCANNED_LINES: usize = 6;

/// Reads the installed version from the marker file in `library_directory`.
///
/// The version is the trimmed text following [`MARKER_LABEL`] on the first
/// line containing it, within the first six lines.
///
/// # Returns
///
/// The version, or `None` if the file is missing, unreadable or has no
/// matching line.
pub fn read_installed_version(library_directory: &Path) -> Option<String> {
    let path = library_directory.join(MARKER_FILE);
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(error) => {
            log::debug!("No marker file at '{}': {error}", path.display());
            return None;
        }
    };

    BufReader::new(file)
        .lines()
        .take(SCANNED_LINES)
        .map_while(Result::ok)
        .find_map(|line| {
            line.find(MARKER_LABEL)
                .map(|index| line[index + MARKER_LABEL.len()..].trim().to_string())
        })
}

/// Replaces the contents of the marker file with `version`.
///
/// The library directory is created if it does not exist.
///
/// # Returns
///
/// Returns `Ok(())` on success, or a [`UpdaterError`] if the file cannot be
/// written.
pub fn write_installed_version(library_directory: &Path, version: &str) -> Result<(), UpdaterError> {
    fs::create_dir_all(library_directory).map_err(|error| UpdaterError::IoCreate {
        path: library_directory.to_path_buf(),
        error,
    })?;

    let path = library_directory.join(MARKER_FILE);
    fs::write(&path, format!("{MARKER_LABEL} {version}"))
        .map_err(|error| UpdaterError::IoWrite { path, error })
}
