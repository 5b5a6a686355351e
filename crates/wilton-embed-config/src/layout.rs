//! Derives the runtime-home and application paths used during bootstrap.
//!
//! Both layouts are resolved from canonical directories so every locator the
//! embed layer hands to the runtime is absolute. Paths are joined with forward
//! slashes on every platform because they end up inside resource locators.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::defaults::{APP_CONFIG_FILE, BIN_DIR, LIB_DIR, STDLIB_ARCHIVE, executable_file_name};

/// Errors raised while resolving layout paths.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Canonicalisation of a path failed.
    #[error("failed to resolve full path of '{path}': {source}")]
    Canonicalise {
        /// Path that could not be resolved.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The canonical path is not representable as UTF-8.
    #[error("full path of '{path}' is not valid UTF-8")]
    NotUtf8 {
        /// Path as supplied by the caller.
        path: Utf8PathBuf,
    },
}

/// Resolves `path` to an absolute, symlink-free path with forward slashes.
///
/// # Errors
///
/// Returns [`LayoutError`] when the path does not exist or its canonical form
/// is not valid UTF-8.
pub fn full_path(path: &Utf8Path) -> Result<Utf8PathBuf, LayoutError> {
    let canonical = fs::canonicalize(path).map_err(|source| LayoutError::Canonicalise {
        path: path.to_path_buf(),
        source,
    })?;
    let utf8 = Utf8PathBuf::from_path_buf(canonical).map_err(|_| LayoutError::NotUtf8 {
        path: path.to_path_buf(),
    })?;
    Ok(normalise_separators(utf8))
}

#[cfg(windows)]
fn normalise_separators(path: Utf8PathBuf) -> Utf8PathBuf {
    let raw = path.as_str();
    let stripped = raw.strip_prefix(r"\\?\").unwrap_or(raw);
    Utf8PathBuf::from(stripped.replace('\\', "/"))
}

#[cfg(not(windows))]
fn normalise_separators(path: Utf8PathBuf) -> Utf8PathBuf {
    path
}

fn child(parent: &Utf8Path, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{parent}/{name}"))
}

/// Canonical paths of a Wilton runtime installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLayout {
    home: Utf8PathBuf,
    bin_dir: Utf8PathBuf,
    lib_dir: Utf8PathBuf,
    stdlib_archive: Utf8PathBuf,
    executable: Utf8PathBuf,
}

impl RuntimeLayout {
    /// Derives the layout from an existing runtime home directory.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the home directory cannot be resolved.
    pub fn resolve(home: &Utf8Path) -> Result<Self, LayoutError> {
        let home = full_path(home)?;
        Ok(Self::from_canonical(home))
    }

    /// Builds the layout from an already canonical home directory.
    #[must_use]
    pub fn from_canonical(home: Utf8PathBuf) -> Self {
        let bin_dir = child(&home, BIN_DIR);
        Self {
            executable: child(&bin_dir, executable_file_name()),
            lib_dir: child(&home, LIB_DIR),
            stdlib_archive: child(&home, STDLIB_ARCHIVE),
            bin_dir,
            home,
        }
    }

    /// Canonical runtime home.
    #[must_use]
    pub fn home(&self) -> &Utf8Path {
        &self.home
    }

    /// Runtime home rendered with a trailing slash.
    #[must_use]
    pub fn home_dir_string(&self) -> String {
        format!("{}/", self.home)
    }

    /// Search root for native modules.
    #[must_use]
    pub fn bin_dir(&self) -> &Utf8Path {
        &self.bin_dir
    }

    /// Optional vendor library directory.
    #[must_use]
    pub fn lib_dir(&self) -> &Utf8Path {
        &self.lib_dir
    }

    /// Bundled standard library archive.
    #[must_use]
    pub fn stdlib_archive(&self) -> &Utf8Path {
        &self.stdlib_archive
    }

    /// Runtime executable.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }
}

/// Paths of the hosted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationLayout {
    requested: Utf8PathBuf,
    dir: Utf8PathBuf,
    config_file: Utf8PathBuf,
}

impl ApplicationLayout {
    /// Derives the layout from an existing application directory.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the directory cannot be resolved.
    pub fn resolve(app_dir: &Utf8Path) -> Result<Self, LayoutError> {
        let dir = full_path(app_dir)?;
        Ok(Self {
            requested: app_dir.to_path_buf(),
            config_file: child(&dir, APP_CONFIG_FILE),
            dir,
        })
    }

    /// Canonical application directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Application directory exactly as the caller supplied it.
    #[must_use]
    pub fn requested(&self) -> &Utf8Path {
        &self.requested
    }

    /// Optional application descriptor.
    #[must_use]
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Final path segment of the requested directory, ignoring trailing
    /// separators. Falls back to the canonical directory when the requested
    /// path ends in `.` or `..`.
    #[must_use]
    pub fn directory_name(&self) -> Option<&str> {
        self.requested.file_name().or_else(|| self.dir.file_name())
    }
}
