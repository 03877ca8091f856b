//! # Release Downloader
//!
//! Downloads a release archive in a background task.
//!
//! [`Downloader::start`] spawns the transfer and returns a [`DownloadHandle`].
//! The handle yields progress percentages while the transfer runs and the
//! [`DownloadOutcome`] once it ends.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use url::Url;

use crate::{errors::UpdaterError, updater::remote::RemoteRelease};

/// Bytes per percent when the server does not announce a length.
const UNKNOWN_LENGTH_STEP: u64 = 100 * 1024;

/// How a download ended.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The archive was written to `path`.
    Success {
        /// The downloaded archive.
        path: PathBuf,
    },
    /// The transfer failed; no archive was kept.
    Failure {
        /// Why the transfer failed.
        cause: UpdaterError,
    },
}

/// Starts archive downloads into a destination directory.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    destination_directory: PathBuf,
}

/// A download in progress.
#[derive(Debug)]
pub struct DownloadHandle {
    destination: PathBuf,
    progress: UnboundedReceiver<u8>,
    task: JoinHandle<DownloadOutcome>,
}

impl Downloader {
    /// Creates a downloader writing into `destination_directory`.
    pub fn new(client: reqwest::Client, destination_directory: impl Into<PathBuf>) -> Self {
        Self {
            client,
            destination_directory: destination_directory.into(),
        }
    }

    /// The local path an archive at `url` is saved to.
    ///
    /// The file name is the last segment of the URL path.
    pub fn destination_for(&self, url: &Url) -> Result<PathBuf, UpdaterError> {
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| UpdaterError::MissingFileName {
                url: url.to_string(),
            })?;
        Ok(self.destination_directory.join(file_name))
    }

    /// Spawns the transfer of `release`'s archive.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Returns
    ///
    /// A [`DownloadHandle`] to wait on, or [`UpdaterError::MissingFileName`]
    /// if no file name can be derived from the download URL.
    pub fn start(&self, release: &RemoteRelease) -> Result<DownloadHandle, UpdaterError> {
        let destination = self.destination_for(&release.download_url)?;
        let (progress_sender, progress) = mpsc::unbounded_channel();

        log::info!(
            "Downloading '{}' to '{}'",
            release.download_url,
            destination.display()
        );

        let client = self.client.clone();
        let url = release.download_url.clone();
        let target = destination.clone();
        let task = tokio::spawn(async move {
            match transfer(&client, &url, &target, &progress_sender).await {
                Ok(()) => DownloadOutcome::Success { path: target },
                Err(cause) => DownloadOutcome::Failure { cause },
            }
        });

        Ok(DownloadHandle {
            destination,
            progress,
            task,
        })
    }
}

impl DownloadHandle {
    /// Where the archive is being written.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Waits for the transfer to end.
    ///
    /// `on_progress` is called with each new percentage, from 0 to 100,
    /// before the outcome is returned.
    pub async fn wait(mut self, mut on_progress: impl FnMut(u8)) -> DownloadOutcome {
        while let Some(percentage) = self.progress.recv().await {
            on_progress(percentage);
        }

        match self.task.await {
            Ok(outcome) => outcome,
            Err(error) => DownloadOutcome::Failure {
                cause: UpdaterError::TaskFailed(error.to_string()),
            },
        }
    }
}

/// Requests `url` and streams the body into `destination`.
///
/// The destination is only created once the server has answered with a
/// success status, and is removed again if streaming fails.
async fn transfer(
    client: &reqwest::Client,
    url: &Url,
    destination: &Path,
    progress: &UnboundedSender<u8>,
) -> Result<(), UpdaterError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|error| UpdaterError::Http {
            url: url.to_string(),
            error,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpdaterError::Status {
            url: url.to_string(),
            status,
        });
    }

    let file = File::create(destination)
        .await
        .map_err(|error| UpdaterError::IoCreate {
            path: destination.to_path_buf(),
            error,
        })?;

    let result = write_body(response, file, url, destination, progress).await;
    if result.is_err() {
        if let Err(error) = fs::remove_file(destination).await {
            log::debug!(
                "Failed to remove partial download '{}': {error}",
                destination.display()
            );
        }
    }
    result
}

async fn write_body(
    response: reqwest::Response,
    mut file: File,
    url: &Url,
    destination: &Path,
    progress: &UnboundedSender<u8>,
) -> Result<(), UpdaterError> {
    let write_error = |error| UpdaterError::IoWrite {
        path: destination.to_path_buf(),
        error,
    };

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;
    let mut last_percentage = None;
    // The receiver may already be gone; progress is display only.
    let mut report = |percentage: u8| {
        if last_percentage != Some(percentage) {
            last_percentage = Some(percentage);
            let _ = progress.send(percentage);
        }
    };

    report(0);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|error| UpdaterError::Http {
            url: url.to_string(),
            error,
        })?;
        file.write_all(&chunk).await.map_err(write_error)?;
        downloaded += chunk.len() as u64;
        report(percentage(downloaded, total));
    }
    file.flush().await.map_err(write_error)?;

    report(100);
    Ok(())
}

/// Percentage of `total` received so far.
///
/// Without a known total the estimate stays below 100 until the transfer
/// ends.
fn percentage(downloaded: u64, total: u64) -> u8 {
    if total > 0 {
        ((downloaded * 100) / total).min(100) as u8
    } else {
        (downloaded / UNKNOWN_LENGTH_STEP).min(99) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn release(url: &str) -> RemoteRelease {
        RemoteRelease {
            version: "5.3.0".to_string(),
            download_url: Url::parse(url).unwrap(),
        }
    }

    #[test]
    fn test_destination_uses_last_path_segment() {
        let downloader = Downloader::new(reqwest::Client::new(), "/tmp/tree");
        let url = Url::parse("http://host/~xiaoye/SuperLU/superlu_5.3.0.tar.gz?mirror=1").unwrap();
        assert_eq!(
            downloader.destination_for(&url).unwrap(),
            PathBuf::from("/tmp/tree/superlu_5.3.0.tar.gz")
        );
    }

    #[test]
    fn test_destination_without_file_name() {
        let downloader = Downloader::new(reqwest::Client::new(), "/tmp/tree");
        let url = Url::parse("http://host/SuperLU/").unwrap();
        assert!(matches!(
            downloader.destination_for(&url),
            Err(UpdaterError::MissingFileName { .. })
        ));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 200), 0);
        assert_eq!(percentage(50, 200), 25);
        assert_eq!(percentage(300, 200), 100);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(u64::MAX / 200, 0), 99);
    }

    #[tokio::test]
    async fn test_download_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/superlu_5.3.0.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"archive-bytes".to_vec()))
            .mount(&server)
            .await;

        let directory = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(reqwest::Client::new(), directory.path());
        let handle = downloader
            .start(&release(&format!("{}/superlu_5.3.0.tar.gz", server.uri())))
            .unwrap();
        let expected = directory.path().join("superlu_5.3.0.tar.gz");
        assert_eq!(handle.destination(), expected);

        let mut reported = Vec::new();
        let outcome = handle.wait(|percentage| reported.push(percentage)).await;

        match outcome {
            DownloadOutcome::Success { path } => assert_eq!(path, expected),
            DownloadOutcome::Failure { cause } => panic!("Expected success, got: {cause}"),
        }
        assert_eq!(std::fs::read(&expected).unwrap(), b"archive-bytes");
        assert_eq!(reported.first(), Some(&0));
        assert_eq!(reported.last(), Some(&100));
    }

    #[tokio::test]
    async fn test_download_failure_keeps_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let directory = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(reqwest::Client::new(), directory.path());
        let handle = downloader
            .start(&release(&format!("{}/superlu_5.3.0.tar.gz", server.uri())))
            .unwrap();

        let outcome = handle.wait(|_| {}).await;

        assert!(matches!(
            outcome,
            DownloadOutcome::Failure {
                cause: UpdaterError::Status { .. }
            }
        ));
        assert!(!directory.path().join("superlu_5.3.0.tar.gz").exists());
    }
}
