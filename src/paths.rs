//! # Paths
//!
//! Well-known names inside the vendored tree and resolution of directories
//! relative to the base directory of the tree.

use std::{
    env,
    path::{Path, PathBuf},
};

use colored::Colorize;

use crate::errors::Error;

/// The directory holding the vendored SuperLU sources.
pub const LIBRARY_DIRECTORY: &str = "SuperLU";

/// The directory holding the Visual Studio solution and its build outputs.
pub const SOLUTION_DIRECTORY: &str = "Visual Studio";

/// The marker file recording the installed version, inside [`LIBRARY_DIRECTORY`].
pub const MARKER_FILE: &str = "version.txt";

/// The label preceding the version token in the marker file.
pub const MARKER_LABEL: &str = "SuperLU VERSION";

/// Resolves directories relative to the base directory of the vendored tree.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base: PathBuf,
}

impl PathResolver {
    /// Creates a resolver rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Creates a resolver rooted at the parent of the current directory.
    ///
    /// The tool is expected to be run from `src/Tools`, one level below the
    /// base directory. If the current directory has no parent it is used
    /// as the base itself.
    pub fn from_current_dir() -> Result<Self, Error> {
        let current = env::current_dir().map_err(Error::CurrentDirectory)?;
        let base = current
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.clone());
        Ok(Self::new(base))
    }

    /// The base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the base directory, joined with `subdirectory` if given.
    pub fn resolve(&self, subdirectory: Option<&str>) -> PathBuf {
        match subdirectory {
            Some(name) => self.base.join(name),
            None => self.base.clone(),
        }
    }

    /// Resolves a directory and checks that it exists.
    ///
    /// Prints a warning and returns `None` if the directory is missing.
    pub fn try_resolve(&self, subdirectory: Option<&str>) -> Option<PathBuf> {
        let path = self.resolve(subdirectory);
        if path.is_dir() {
            Some(path)
        } else {
            println!(
                "{}",
                format!("Couldn't find directory \"{}\"", path.display()).red()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_subdirectory() {
        let resolver = PathResolver::new("/tmp/tree");
        assert_eq!(resolver.resolve(None), PathBuf::from("/tmp/tree"));
        assert_eq!(
            resolver.resolve(Some(LIBRARY_DIRECTORY)),
            PathBuf::from("/tmp/tree/SuperLU")
        );
    }

    #[test]
    fn test_try_resolve_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(root.path());
        assert!(resolver.try_resolve(Some("missing")).is_none());
    }

    #[test]
    fn test_try_resolve_existing_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join(SOLUTION_DIRECTORY)).unwrap();
        let resolver = PathResolver::new(root.path());
        assert_eq!(
            resolver.try_resolve(Some(SOLUTION_DIRECTORY)),
            Some(root.path().join(SOLUTION_DIRECTORY))
        );
    }

    #[test]
    fn test_from_current_dir_uses_parent() {
        let current = env::current_dir().unwrap();
        let resolver = PathResolver::from_current_dir().unwrap();
        assert_eq!(resolver.base(), current.parent().unwrap_or(current.as_path()));
    }
}
