//! Discovery of the script packages available to the hosted application.
//!
//! Two sources feed the module-resolution section of the configuration
//! document: the package manifest bundled inside the standard library archive,
//! and the optional vendor directory under the runtime home. Both are read
//! once per `init` and handed on unchanged.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::ser::{Serialize, SerializeMap, Serializer};
use wilton_embed_config::{ARCHIVE_PROTO_PREFIX, FILE_PROTO_PREFIX};

mod packages;
mod vendor;

pub use packages::{load_bundled_packages, read_package_manifest};
pub use vendor::scan_vendor_directory;

/// Tagged path telling the module loader where a module's code lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocator {
    /// Load from the filesystem.
    File(Utf8PathBuf),
    /// Load from inside a packaged archive.
    Archive(Utf8PathBuf),
}

impl ModuleLocator {
    /// Locator for a filesystem path.
    #[must_use]
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Locator for a packaged archive.
    #[must_use]
    pub fn archive(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Archive(path.into())
    }

    /// Path without its protocol prefix.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::File(path) | Self::Archive(path) => path,
        }
    }

    const fn prefix(&self) -> &'static str {
        match self {
            Self::File(_) => FILE_PROTO_PREFIX,
            Self::Archive(_) => ARCHIVE_PROTO_PREFIX,
        }
    }
}

impl fmt::Display for ModuleLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}{}", self.prefix(), self.path())
    }
}

impl Serialize for ModuleLocator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Logical module names mapped to locators, in emission order.
///
/// Duplicate names are kept; the module loader reads the mapping in order so
/// the last entry for a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePaths {
    entries: Vec<(String, ModuleLocator)>,
}

impl ModulePaths {
    /// Appends an entry.
    pub fn push(&mut self, name: impl Into<String>, locator: ModuleLocator) {
        self.entries.push((name.into(), locator));
    }

    /// Entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[(String, ModuleLocator)] {
        &self.entries
    }

    /// Locator of the last entry registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleLocator> {
        self.entries
            .iter()
            .rev()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, locator)| locator)
    }

    /// Number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entry was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ModulePaths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, locator) in &self.entries {
            map.serialize_entry(name, locator)?;
        }
        map.end()
    }
}
