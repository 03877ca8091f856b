//! # Cleanup Profiles
//!
//! A profile is a named list of files and directories to delete, relative to
//! one directory of the vendored tree.

use serde::{Deserialize, Serialize};

use crate::paths::{LIBRARY_DIRECTORY, SOLUTION_DIRECTORY};

/// A named set of cleanup targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupProfile {
    /// The name used on the command line, e.g. `docs` for `clean -docs`.
    pub name: String,
    /// Subdirectory of the base directory the targets are relative to.
    pub root: String,
    /// What to delete.
    pub targets: Vec<CleanupTarget>,
}

/// A single file or directory to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupTarget {
    /// Name of the entry, relative to its location.
    pub path: String,
    /// Whether the entry is a directory or a file.
    pub kind: TargetKind,
    /// Where the entry is looked up.
    #[serde(default)]
    pub scope: Scope,
}

/// The kind of entry a [`CleanupTarget`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Removed recursively.
    Directory,
    /// Removed only if it is a regular file.
    File,
}

/// Where a [`CleanupTarget`] is looked up, relative to the profile root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Directly under the profile root.
    #[default]
    Root,
    /// Inside every immediate subdirectory of the given path. An empty path
    /// means the profile root itself.
    EachSubdirectory(String),
}

impl CleanupTarget {
    /// A directory directly under the profile root.
    pub fn directory(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: TargetKind::Directory,
            scope: Scope::Root,
        }
    }

    /// A file directly under the profile root.
    pub fn file(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: TargetKind::File,
            scope: Scope::Root,
        }
    }

    /// Moves the target inside each immediate subdirectory of `parent`.
    pub fn in_each_subdirectory_of(mut self, parent: &str) -> Self {
        self.scope = Scope::EachSubdirectory(parent.to_string());
        self
    }
}

impl CleanupProfile {
    /// The built-in profiles: `default`, `docs` and `build`, in that order.
    pub fn builtin() -> Vec<CleanupProfile> {
        vec![
            Self::default_profile(),
            Self::docs_profile(),
            Self::build_profile(),
        ]
    }

    /// Build scripts and sources that are not used by the Visual Studio build.
    fn default_profile() -> CleanupProfile {
        let directories = ["cmake", "FORTRAN", "lib", "MAKE_INC", "MATLAB", "TESTING"];
        let files = [
            ".gitignore",
            "CMakeLists.txt",
            "DoxyConfig",
            "make.inc",
            "make.inc.in",
            "Makefile",
        ];

        let targets = directories
            .into_iter()
            .map(CleanupTarget::directory)
            .chain(files.into_iter().map(CleanupTarget::file))
            .collect();

        CleanupProfile {
            name: "default".to_string(),
            root: LIBRARY_DIRECTORY.to_string(),
            targets,
        }
    }

    /// `Doc` directories one level below the library directory.
    fn docs_profile() -> CleanupProfile {
        CleanupProfile {
            name: "docs".to_string(),
            root: LIBRARY_DIRECTORY.to_string(),
            targets: vec![CleanupTarget::directory("Doc").in_each_subdirectory_of("")],
        }
    }

    /// Visual Studio output directories of every shared and static project.
    fn build_profile() -> CleanupProfile {
        let targets = ["shared", "static"]
            .into_iter()
            .flat_map(|parent| {
                ["Release", "Debug", "x64"]
                    .into_iter()
                    .map(move |name| CleanupTarget::directory(name).in_each_subdirectory_of(parent))
            })
            .collect();

        CleanupProfile {
            name: "build".to_string(),
            root: SOLUTION_DIRECTORY.to_string(),
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_targets() {
        let profile = CleanupProfile::default_profile();
        assert_eq!(profile.root, "SuperLU");
        assert_eq!(profile.targets.len(), 12);
        assert!(profile.targets.contains(&CleanupTarget::directory("MATLAB")));
        assert!(profile.targets.contains(&CleanupTarget::file("make.inc.in")));
    }

    #[test]
    fn test_build_profile_covers_shared_and_static() {
        let profile = CleanupProfile::build_profile();
        assert_eq!(profile.root, "Visual Studio");
        assert_eq!(profile.targets.len(), 6);
        assert!(
            profile
                .targets
                .contains(&CleanupTarget::directory("x64").in_each_subdirectory_of("static"))
        );
    }

    #[test]
    fn test_scope_deserializes_from_json() {
        let target: CleanupTarget = serde_json::from_str(
            r#"{ "path": "Debug", "kind": "directory", "scope": { "each_subdirectory": "shared" } }"#,
        )
        .unwrap();
        assert_eq!(
            target,
            CleanupTarget::directory("Debug").in_each_subdirectory_of("shared")
        );
    }
}
