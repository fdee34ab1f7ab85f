// SPDX-License-Identifier: MPL-2.0

//! Settings Sources
//!
//! Reads raw settings text from the local file or from a URL, and writes the
//! local file back.
//!
//! # First Run
//!
//! A missing local file is not an error at startup: [`load_or_bootstrap`]
//! writes the default payload to the path and hands it back, so the next run
//! finds a file the user can edit.
//!
//! # Saving While Network Settings Are Active
//!
//! Values that came from the network must not leak into the local file. With
//! `use-net-settings` on, [`save`] keeps the file's existing lines and only
//! rewrites the `use-net-settings` entry.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::{DELIMITER, Settings, default_payload, keys};
use crate::error::LoadError;

/// Network fetches give up after this long.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Reading
// ============================================================================

/// Read the settings file at `path`.
pub fn load_from_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))
}

/// Read the settings file, creating it with the default payload if it does
/// not exist yet.
pub fn load_or_bootstrap(path: &Path) -> Result<String, LoadError> {
    match load_from_file(path) {
        Err(LoadError::NotFound { .. }) => {
            log::info!("No settings file at {:?}, writing defaults", path);
            let payload = default_payload();
            fs::write(path, &payload).map_err(|e| LoadError::from_io(path, e))?;
            Ok(payload)
        }
        other => other,
    }
}

/// Source of remote settings text.
///
/// The production implementation is [`HttpFetcher`]; the trait keeps the
/// application testable without a network.
pub trait Fetch: Send + 'static {
    fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

/// Blocking HTTP client with a short timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        load_from_url(&self.client, url)
    }
}

/// Download the settings text at `url`. Non-success statuses are errors.
pub fn load_from_url(client: &reqwest::blocking::Client, url: &str) -> Result<String, LoadError> {
    log::debug!("Fetching network settings from {}", url);

    let http = |source| LoadError::Http { url: url.to_string(), source };

    let response = client.get(url).send().map_err(http)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status { url: url.to_string(), status: status.as_u16() });
    }

    response.text().map_err(http)
}

// ============================================================================
// Writing
// ============================================================================

/// Persist `settings` to `path`.
pub fn save(path: &Path, settings: &Settings) -> Result<(), LoadError> {
    let contents = if settings.use_net_settings {
        match load_from_file(path) {
            Ok(existing) => replace_use_net_line(&existing, settings.use_net_settings),
            Err(e) => {
                log::warn!("Could not read {:?} before saving ({}), writing all settings", path, e);
                settings.to_settings_text()
            }
        }
    } else {
        settings.to_settings_text()
    };

    fs::write(path, contents).map_err(|e| LoadError::from_io(path, e))?;
    log::info!("Settings saved to {:?}", path);
    Ok(())
}

/// Drop every `use-net-settings` line from `existing` and append a fresh one.
fn replace_use_net_line(existing: &str, use_net: bool) -> String {
    let mut out: String = existing
        .lines()
        .filter(|line| line.split(DELIMITER).next().map(str::trim) != Some(keys::USE_NET_SETTINGS))
        .map(|line| format!("{line}\n"))
        .collect();
    out.push_str(&format!("{}{DELIMITER}{use_net}\n", keys::USE_NET_SETTINGS));
    out
}
