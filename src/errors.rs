//! # Error Types
//!
//! This module defines the error types used throughout the crate.

use std::{io, path::PathBuf};

use thiserror;

/// Errors that can end an invocation of the tool.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to determine the current working directory.
    #[error("Failed to read the current directory: {0}")]
    CurrentDirectory(#[source] io::Error),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The update task failed.
    #[error(transparent)]
    Updater(#[from] UpdaterError),

    /// The cleanup task failed.
    #[error(transparent)]
    Cleaner(#[from] CleanerError),
}

/// Errors that occur while loading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read '{path}': {error}")]
    IoRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to deserialize the configuration file.
    #[error("Failed to deserialize '{path}': {error}")]
    Deserialize {
        /// The configuration file.
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        error: serde_json::Error,
    },

    /// The download template has no `{version}` placeholder.
    #[error("Download template '{template}' has no {{version}} placeholder")]
    InvalidTemplate {
        /// The offending template.
        template: String,
    },
}

/// Errors that occur while checking for or downloading a release.
#[derive(thiserror::Error, Debug)]
pub enum UpdaterError {
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A request could not be sent or its body could not be read.
    #[error("Request to '{url}' failed: {error}")]
    Http {
        /// The requested URL.
        url: String,
        /// The underlying transport error.
        #[source]
        error: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Request to '{url}' returned {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status received.
        status: reqwest::StatusCode,
    },

    /// The download URL built from the template is not a valid URL.
    #[error("Invalid download URL '{url}': {error}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The underlying parse error.
        #[source]
        error: url::ParseError,
    },

    /// The download URL has no file name in its path.
    #[error("Download URL '{url}' has no file name")]
    MissingFileName {
        /// The download URL.
        url: String,
    },

    /// Failed to create a file or directory.
    #[error("Failed to create '{path}': {error}")]
    IoCreate {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write to a file.
    #[error("Failed to write '{path}': {error}")]
    IoWrite {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write the report to the console.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),

    /// Failed to start the async runtime.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] io::Error),

    /// Failed to create a progress bar.
    #[error("Failed to create progress bar: {0}")]
    ProgressBar(String),

    /// The transfer task panicked or was cancelled.
    #[error("Download task failed: {0}")]
    TaskFailed(String),
}

/// Errors that occur while deleting cleanup targets.
#[derive(thiserror::Error, Debug)]
pub enum CleanerError {
    /// Failed to list a directory.
    #[error("Failed to read '{path}': {error}")]
    IoRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to remove a file or directory.
    #[error("Failed to delete '{path}': {error}")]
    IoDelete {
        /// The path that could not be removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}
