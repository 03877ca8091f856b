//! # Updater
//!
//! This module checks the upstream project for a newer SuperLU release and
//! downloads it.
//!
//! The installed version is read from the marker file in the library
//! directory. The latest version is scraped from the upstream listing page.
//! After a successful download the marker file records the new version.

pub mod downloader;
pub mod remote;
pub mod version;

use std::io::Write;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

pub use downloader::{DownloadHandle, DownloadOutcome, Downloader};
pub use remote::RemoteRelease;

use crate::{
    cli::UpdateAction,
    config::UpdaterConfig,
    errors::UpdaterError,
    paths::{LIBRARY_DIRECTORY, PathResolver},
};

/// Displayed in place of a version that could not be determined.
const UNKNOWN_VERSION: &str = "n/a";

/// The installed and latest versions, as printed by `update -check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// The version recorded in the marker file.
    pub installed: Option<String>,
    /// The version found on the listing page.
    pub latest: Option<String>,
}

fn display_version(version: &Option<String>) -> &str {
    version.as_deref().unwrap_or(UNKNOWN_VERSION)
}

/// Checks for and downloads SuperLU releases.
#[derive(Debug, Clone)]
pub struct Updater {
    config: UpdaterConfig,
    paths: PathResolver,
    client: reqwest::Client,
}

impl Updater {
    /// Creates an updater for the tree resolved by `paths`.
    pub fn new(config: UpdaterConfig, paths: PathResolver) -> Result<Self, UpdaterError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("superlu-mgmt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpdaterError::Client)?;

        Ok(Self {
            config,
            paths,
            client,
        })
    }

    /// The version recorded in the marker file, if any.
    pub fn installed_version(&self) -> Option<String> {
        version::read_installed_version(&self.paths.resolve(Some(LIBRARY_DIRECTORY)))
    }

    /// The latest release on the listing page, if one can be found.
    pub async fn latest_release(&self) -> Result<Option<RemoteRelease>, UpdaterError> {
        remote::fetch_latest_release(&self.client, &self.config).await
    }

    /// Compares the installed version with the latest release.
    ///
    /// The installed version is written to `out` before the listing page is
    /// fetched, so it is shown even if the fetch fails. The latest version
    /// follows once it is known.
    pub async fn check(&self, out: &mut impl Write) -> Result<CheckReport, UpdaterError> {
        let installed = self.installed_version();
        writeln!(out, "Installed version: {}", display_version(&installed))
            .map_err(UpdaterError::Output)?;

        let latest = self.latest_release().await?.map(|release| release.version);
        writeln!(out, "Latest version: {}", display_version(&latest))
            .map_err(UpdaterError::Output)?;

        Ok(CheckReport { installed, latest })
    }

    /// Downloads `release` into the base directory.
    ///
    /// The marker file is rewritten with the release version only if the
    /// download succeeds.
    ///
    /// # Arguments
    ///
    /// - `release` - The release to download.
    /// - `on_progress` - Called with each new percentage.
    ///
    /// # Returns
    ///
    /// The [`DownloadOutcome`], or a [`UpdaterError`] if the download cannot
    /// be started or the marker file cannot be written.
    pub async fn download(
        &self,
        release: &RemoteRelease,
        on_progress: impl FnMut(u8),
    ) -> Result<DownloadOutcome, UpdaterError> {
        let downloader = Downloader::new(self.client.clone(), self.paths.base());
        let outcome = downloader.start(release)?.wait(on_progress).await;

        if let DownloadOutcome::Success { path } = &outcome {
            log::info!("Downloaded '{}'", path.display());
            version::write_installed_version(
                &self.paths.resolve(Some(LIBRARY_DIRECTORY)),
                &release.version,
            )?;
        }
        Ok(outcome)
    }
}

/// Runs the update task.
///
/// Without any action, `-check` is run. Actions are processed in order on a
/// runtime created for this invocation.
///
/// # Arguments
///
/// - `actions` - The flags given after `update`.
/// - `config` - Where to look for releases.
/// - `paths` - Resolves the library and download directories.
///
/// # Returns
///
/// Returns `Ok(())` on success, or a [`UpdaterError`] if the listing page
/// cannot be fetched or the download fails.
pub fn run(
    actions: &[UpdateAction],
    config: &UpdaterConfig,
    paths: &PathResolver,
) -> Result<(), UpdaterError> {
    println!("Running update task ...");

    let default_action = [UpdateAction::Check];
    let actions = if actions.is_empty() {
        &default_action[..]
    } else {
        actions
    };

    let updater = Updater::new(config.clone(), paths.clone())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(UpdaterError::Runtime)?;

    runtime.block_on(async {
        for action in actions {
            match action {
                UpdateAction::Check => {
                    updater.check(&mut std::io::stdout()).await?;
                }
                UpdateAction::Download => download_latest(&updater).await?,
                UpdateAction::Unknown(flag) => {
                    println!("{}", format!("Unknown update flag: {flag}").red())
                }
            }
        }
        Ok::<(), UpdaterError>(())
    })
}

/// Fetches the latest release and downloads it with a progress bar.
async fn download_latest(updater: &Updater) -> Result<(), UpdaterError> {
    let latest = updater.latest_release().await?;
    println!(
        "Latest version: {}",
        display_version(&latest.as_ref().map(|release| release.version.clone()))
    );

    let Some(release) = latest else {
        return Ok(());
    };

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.white/white} {pos}% {msg}")
            .map_err(|error| UpdaterError::ProgressBar(error.to_string()))?
            .progress_chars("##-"),
    );
    progress_bar.set_message("Downloading ...");

    let outcome = updater
        .download(&release, |percentage| {
            progress_bar.set_position(u64::from(percentage))
        })
        .await?;

    match outcome {
        DownloadOutcome::Success { .. } => {
            progress_bar.finish_with_message("Downloading ... Done!");
            Ok(())
        }
        DownloadOutcome::Failure { cause } => {
            progress_bar.abandon_with_message("Downloading ... Failed!".red().to_string());
            Err(cause)
        }
    }
}
