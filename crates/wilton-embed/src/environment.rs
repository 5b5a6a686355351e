//! Deterministic snapshot of the process environment.
//!
//! Entries are read as raw `NAME=VALUE` bytes, split on every `=`, trimmed,
//! and re-joined so that values containing `=` survive intact. Invalid UTF-8
//! is replaced rather than rejected, and the result is sorted by name.

use std::env;
use std::ffi::OsStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ConfigurationError;

/// Source of raw `NAME=VALUE` environment entries.
pub trait EnvironmentSource: Send + Sync {
    /// Returns every entry of the environment table.
    fn entries(&self) -> Vec<Vec<u8>>;
}

/// Reads the environment table of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn entries(&self) -> Vec<Vec<u8>> {
        env::vars_os()
            .map(|(name, value)| {
                let mut entry = os_bytes(&name);
                entry.push(b'=');
                entry.extend(os_bytes(&value));
                entry
            })
            .collect()
    }
}

#[cfg(unix)]
fn os_bytes(value: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    value.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn os_bytes(value: &OsStr) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}

fn sanitise(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes.trim_ascii()).into_owned()
}

fn value_from_fragments(parts: &[&[u8]]) -> Result<String, ConfigurationError> {
    let Some((_, fragments)) = parts.split_first() else {
        return Err(ConfigurationError::EnvironmentEntry { parts: parts.len() });
    };
    let Some((first, rest)) = fragments.split_first() else {
        return Err(ConfigurationError::EnvironmentEntry { parts: parts.len() });
    };
    let mut value = first.trim_ascii().to_vec();
    for fragment in rest {
        value.push(b'=');
        value.extend_from_slice(fragment.trim_ascii());
    }
    Ok(String::from_utf8_lossy(&value).into_owned())
}

/// Sorted, UTF-8 clean copy of the environment table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    variables: Vec<(String, String)>,
}

impl EnvironmentSnapshot {
    /// Captures the entries exposed by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EnvironmentEntry`] when an entry splits
    /// into fewer than two fragments.
    pub fn capture(source: &dyn EnvironmentSource) -> Result<Self, ConfigurationError> {
        Self::from_entries(source.entries())
    }

    /// Builds a snapshot from raw `NAME=VALUE` entries.
    ///
    /// Entries without `=` are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EnvironmentEntry`] when an entry splits
    /// into fewer than two fragments.
    pub fn from_entries<I, E>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = E>,
        E: AsRef<[u8]>,
    {
        let mut variables = Vec::new();
        for entry in entries {
            let entry = entry.as_ref();
            if !entry.contains(&b'=') {
                continue;
            }
            let parts: Vec<&[u8]> = entry.split(|byte| *byte == b'=').collect();
            let name = parts
                .first()
                .map(|raw| sanitise(raw))
                .unwrap_or_default();
            let value = value_from_fragments(&parts)?;
            variables.push((name, value));
        }
        variables.sort_by(|left, right| left.0.cmp(&right.0));
        Ok(Self { variables })
    }

    /// Variables in name order.
    #[must_use]
    pub fn variables(&self) -> &[(String, String)] {
        &self.variables
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` when nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl Serialize for EnvironmentSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variables.len()))?;
        for (name, value) in &self.variables {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
