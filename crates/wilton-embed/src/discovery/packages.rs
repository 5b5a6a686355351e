//! Bundled package manifest stored inside the standard library archive.

use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use serde_json::Value;
use tracing::debug;
use wilton_embed_config::{PACKAGES_MANIFEST_ENTRY, RuntimeLayout, native_module_name};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::activation::ModuleRegistry;
use crate::error::DiscoveryError;

/// Suffix of the native archive reader module.
const ARCHIVE_MODULE: &str = "zip";

/// Activates the archive reader module, then reads the package manifest.
///
/// The archive reader has to be loaded directly because the general module
/// loader is not active yet at this point of the bootstrap.
///
/// # Errors
///
/// Returns [`DiscoveryError`] when the archive reader cannot be loaded or the
/// manifest cannot be read.
pub fn load_bundled_packages(
    layout: &RuntimeLayout,
    registry: &dyn ModuleRegistry,
) -> Result<Vec<Value>, DiscoveryError> {
    registry.load(&native_module_name(ARCHIVE_MODULE), layout.bin_dir())?;
    read_package_manifest(layout.stdlib_archive())
}

/// Reads the package manifest entry of `archive` as a JSON array.
///
/// # Errors
///
/// Returns [`DiscoveryError`] when the archive cannot be opened, the entry is
/// missing, or its contents are not a JSON array.
pub fn read_package_manifest(archive: &Utf8Path) -> Result<Vec<Value>, DiscoveryError> {
    let file = File::open(archive).map_err(|source| DiscoveryError::ArchiveOpen {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip =
        ZipArchive::new(BufReader::new(file)).map_err(|source| DiscoveryError::ArchiveRead {
            path: archive.to_path_buf(),
            source,
        })?;
    let entry = match zip.by_name(PACKAGES_MANIFEST_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(DiscoveryError::ManifestMissing {
                entry: PACKAGES_MANIFEST_ENTRY,
                path: archive.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DiscoveryError::ArchiveRead {
                path: archive.to_path_buf(),
                source,
            });
        }
    };
    let manifest: Value =
        serde_json::from_reader(entry).map_err(|source| DiscoveryError::ManifestParse {
            entry: PACKAGES_MANIFEST_ENTRY,
            path: archive.to_path_buf(),
            source,
        })?;
    match manifest {
        Value::Array(packages) => {
            debug!(archive = %archive, count = packages.len(), "read bundled package manifest");
            Ok(packages)
        }
        other => Err(DiscoveryError::ManifestNotArray {
            entry: PACKAGES_MANIFEST_ENTRY,
            found: json_type_name(&other),
        }),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
