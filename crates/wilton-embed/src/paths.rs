//! Fail-fast checks on the runtime home and application directory.

use std::fs;

use camino::Utf8Path;

use crate::error::ConfigurationError;

fn is_directory(path: &Utf8Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.is_dir())
}

/// Confirms both directories exist and are directories.
///
/// # Errors
///
/// Returns [`ConfigurationError::RuntimeHomeNotFound`] or
/// [`ConfigurationError::AppDirNotFound`] for the first path that fails.
pub fn validate(runtime_home: &Utf8Path, app_dir: &Utf8Path) -> Result<(), ConfigurationError> {
    if !is_directory(runtime_home) {
        return Err(ConfigurationError::RuntimeHomeNotFound {
            path: runtime_home.to_path_buf(),
        });
    }
    if !is_directory(app_dir) {
        return Err(ConfigurationError::AppDirNotFound {
            path: app_dir.to_path_buf(),
        });
    }
    Ok(())
}
