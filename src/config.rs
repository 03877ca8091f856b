//! # Configuration
//!
//! The update source and the cleanup profiles. Both default to the values for
//! the upstream SuperLU project and can be overridden with a JSON file passed
//! through `--config`.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{cleaner::CleanupProfile, errors::ConfigError};

/// Placeholder substituted with the version token in the download template.
pub const VERSION_PLACEHOLDER: &str = "{version}";

const DEFAULT_PAGE_URL: &str = "http://crd-legacy.lbl.gov/~xiaoye/SuperLU/";
const DEFAULT_DOWNLOAD_TEMPLATE: &str =
    "http://crd-legacy.lbl.gov/~xiaoye/SuperLU/superlu_{version}.tar.gz";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to look for new releases.
    pub updater: UpdaterConfig,
    /// Cleanup profiles, in the order `-all` runs them.
    pub profiles: Vec<CleanupProfile>,
}

/// Where the update task looks for new releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// The listing page scraped for the latest version.
    pub page_url: String,
    /// The archive URL, with a `{version}` placeholder.
    pub download_template: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            download_template: DEFAULT_DOWNLOAD_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// # Arguments
    ///
    /// - `path` - A JSON configuration file. Without one the built-in
    ///   defaults are used.
    ///
    /// # Returns
    ///
    /// The [`Config`] on success, or a [`ConfigError`] if the file cannot be
    /// read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|error| ConfigError::IoRead {
                    path: path.to_path_buf(),
                    error,
                })?;
                serde_json::from_str(&raw).map_err(|error| ConfigError::Deserialize {
                    path: path.to_path_buf(),
                    error,
                })?
            }
            None => Config::default(),
        };

        if config.profiles.is_empty() {
            config.profiles = CleanupProfile::builtin();
        }
        config.validate()?;

        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.updater.download_template.contains(VERSION_PLACEHOLDER) {
            return Err(ConfigError::InvalidTemplate {
                template: self.updater.download_template.clone(),
            });
        }
        Ok(())
    }
}
