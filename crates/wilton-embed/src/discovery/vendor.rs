//! Non-recursive scan of the vendor library directory.

use std::fs;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;
use wilton_embed_config::RuntimeLayout;
use wilton_embed_config::defaults::{PACKAGED_LIBRARY_SUFFIX, SCRIPT_SUFFIX};

use super::{ModuleLocator, ModulePaths};
use crate::error::DiscoveryError;

/// Builds the module path mapping for the application and the vendor libraries.
///
/// The application entry always comes first. Vendor entries follow in
/// directory-listing order: a subdirectory maps to itself, `name.js` maps to
/// the sibling path `name`, and `name.wlib` maps into the archive. Symbolic
/// links are followed wherever they point; dangling links and anything else
/// are skipped.
///
/// # Errors
///
/// Returns [`DiscoveryError::VendorDirectory`] when an existing vendor
/// directory cannot be listed.
pub fn scan_vendor_directory(
    layout: &RuntimeLayout,
    app_name: &str,
    app_dir: &Utf8Path,
) -> Result<ModulePaths, DiscoveryError> {
    let mut paths = ModulePaths::default();
    paths.push(app_name, ModuleLocator::file(app_dir));

    let lib_dir = layout.lib_dir();
    if !fs::metadata(lib_dir).is_ok_and(|metadata| metadata.is_dir()) {
        return Ok(paths);
    }

    let listing_error = |source| DiscoveryError::VendorDirectory {
        path: lib_dir.to_path_buf(),
        source,
    };
    let dir = Dir::open_ambient_dir(lib_dir, ambient_authority()).map_err(listing_error)?;
    for entry in dir.entries().map_err(listing_error)? {
        let entry = entry.map_err(listing_error)?;
        let Ok(file_name) = entry.file_name().into_string() else {
            debug!(lib_dir = %lib_dir, "skipping vendor entry with a non UTF-8 name");
            continue;
        };
        // Stat outside the `Dir` sandbox: links may point anywhere.
        let Ok(metadata) = fs::metadata(lib_dir.join(&file_name)) else {
            debug!(lib_dir = %lib_dir, entry = %file_name, "skipping unreadable vendor entry");
            continue;
        };
        if let Some((name, locator)) = classify(lib_dir, &file_name, metadata.is_dir()) {
            paths.push(name, locator);
        }
    }
    Ok(paths)
}

fn classify(lib_dir: &Utf8Path, file_name: &str, is_dir: bool) -> Option<(String, ModuleLocator)> {
    let sibling = |name: &str| format!("{lib_dir}/{name}");
    if is_dir {
        return Some((file_name.to_owned(), ModuleLocator::file(sibling(file_name))));
    }
    if let Some(module) = file_name.strip_suffix(SCRIPT_SUFFIX) {
        return Some((module.to_owned(), ModuleLocator::file(sibling(module))));
    }
    if let Some(module) = file_name.strip_suffix(PACKAGED_LIBRARY_SUFFIX) {
        return Some((module.to_owned(), ModuleLocator::archive(sibling(file_name))));
    }
    None
}
