//! # Latest Release
//!
//! Scrapes the upstream listing page for the newest SuperLU version and
//! derives the archive URL for it.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::{
    config::{UpdaterConfig, VERSION_PLACEHOLDER},
    errors::UpdaterError,
};

lazy_static! {
    static ref VERSION_PATTERN: Regex =
        Regex::new(r">SuperLU Version ([\.\d]+)").expect("version pattern is valid");
}

/// A release found on the listing page.
///
/// Only exists when a version was matched, so a download URL always comes
/// with the version it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRelease {
    /// The version token, e.g. `5.3.0`.
    pub version: String,
    /// The archive URL for `version`.
    pub download_url: Url,
}

/// Extracts the latest release from the listing page.
///
/// # Arguments
///
/// - `page` - The HTML body of the listing page.
/// - `template` - The download URL, with a `{version}` placeholder.
///
/// # Returns
///
/// `Ok(None)` if the page has no version, the [`RemoteRelease`] otherwise,
/// or [`UpdaterError::InvalidUrl`] if the substituted template is not a URL.
pub fn parse_release(page: &str, template: &str) -> Result<Option<RemoteRelease>, UpdaterError> {
    let Some(captures) = VERSION_PATTERN.captures(page) else {
        return Ok(None);
    };
    let version = captures[1].to_string();

    let url = template.replace(VERSION_PLACEHOLDER, &version);
    let download_url = Url::parse(&url).map_err(|error| UpdaterError::InvalidUrl { url, error })?;

    Ok(Some(RemoteRelease {
        version,
        download_url,
    }))
}

/// Fetches the listing page and extracts the latest release.
///
/// Transport errors and non-success statuses are returned as errors; there
/// is no retry.
pub async fn fetch_latest_release(
    client: &reqwest::Client,
    config: &UpdaterConfig,
) -> Result<Option<RemoteRelease>, UpdaterError> {
    let url = &config.page_url;
    log::debug!("Fetching release listing from '{url}'");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| UpdaterError::Http {
            url: url.clone(),
            error,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpdaterError::Status {
            url: url.clone(),
            status,
        });
    }

    let page = response.text().await.map_err(|error| UpdaterError::Http {
        url: url.clone(),
        error,
    })?;

    parse_release(&page, &config.download_template)
}
