//! Optional per-application descriptor stored at `conf/config.json`.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::logging::LoggingSettings;

/// Errors raised while reading the application descriptor.
#[derive(Debug, Error)]
pub enum AppConfigError {
    /// The descriptor exists but could not be read.
    #[error("failed to read application config '{path}': {source}")]
    Read {
        /// Descriptor path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The descriptor is not valid JSON of the expected shape.
    #[error("failed to parse application config '{path}': {source}")]
    Parse {
        /// Descriptor path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The descriptor lacks a non-empty `appname` string.
    #[error("application config '{path}' must define a non-empty 'appname' string")]
    MissingAppName {
        /// Descriptor path.
        path: Utf8PathBuf,
    },
}

/// Parsed application descriptor.
///
/// Unknown fields are ignored: the same file also carries settings consumed by
/// the runtime's own modules. A malformed `embed` section falls back to the
/// default logging settings rather than hiding `appname`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    appname: Option<String>,
    #[serde(deserialize_with = "lenient_logging")]
    embed: LoggingSettings,
    #[serde(skip)]
    path: Utf8PathBuf,
}

fn lenient_logging<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<LoggingSettings, D::Error> {
    let section = serde_json::Value::deserialize(deserializer)?;
    Ok(LoggingSettings::deserialize(section).unwrap_or_default())
}

impl AppConfig {
    /// Reads the descriptor when `path` names a regular file.
    ///
    /// Returns `Ok(None)` when the file is absent or is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`AppConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Utf8Path) -> Result<Option<Self>, AppConfigError> {
        let is_file = fs::metadata(path).is_ok_and(|metadata| metadata.is_file());
        if !is_file {
            return Ok(None);
        }
        let raw = fs::read(path).map_err(|source| AppConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_json::from_slice(&raw).map_err(|source| AppConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.path = path.to_path_buf();
        Ok(Some(config))
    }

    /// Returns the mandatory application name.
    ///
    /// # Errors
    ///
    /// Returns [`AppConfigError::MissingAppName`] when `appname` is absent or
    /// empty.
    pub fn application_name(&self) -> Result<&str, AppConfigError> {
        match self.appname.as_deref() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(AppConfigError::MissingAppName {
                path: self.path.clone(),
            }),
        }
    }

    /// Telemetry settings for the embed layer.
    #[must_use]
    pub const fn logging(&self) -> &LoggingSettings {
        &self.embed
    }
}
