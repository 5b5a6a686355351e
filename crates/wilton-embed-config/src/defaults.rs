//! Fixed names and defaults of the Wilton runtime layout.

use crate::logging::LogFormat;

/// Namespace prefixed to every native module name.
pub const MODULE_NAMESPACE: &str = "wilton";

/// Directory under the runtime home holding native modules and executables.
pub const BIN_DIR: &str = "bin";

/// Optional vendor library directory under the runtime home.
pub const LIB_DIR: &str = "lib";

/// Bundled standard library archive under the runtime home.
pub const STDLIB_ARCHIVE: &str = "std.wlib";

/// Manifest entry inside the standard library archive listing the packages.
pub const PACKAGES_MANIFEST_ENTRY: &str = "wilton-requirejs/wilton-packages.json";

/// Optional application descriptor relative to the application directory.
pub const APP_CONFIG_FILE: &str = "conf/config.json";

/// Suffix of script sources in the vendor directory.
pub const SCRIPT_SUFFIX: &str = ".js";

/// Suffix of packaged libraries in the vendor directory.
pub const PACKAGED_LIBRARY_SUFFIX: &str = ".wlib";

/// Prefix marking a locator that is loaded from the filesystem.
pub const FILE_PROTO_PREFIX: &str = "file://";

/// Prefix marking a locator that is loaded from inside an archive.
pub const ARCHIVE_PROTO_PREFIX: &str = "zip://";

/// Runtime version baked in at compile time through `WILTON_VERSION`.
pub const WILTON_VERSION: &str = match option_env!("WILTON_VERSION") {
    Some(version) => version,
    None => "UNSPECIFIED",
};

/// Default log filter expression for the embed layer's own telemetry.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression for the embed layer's own telemetry.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format; the embed layer writes into a host's stderr.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Builds the namespaced native module name, e.g. `wilton_loader`.
#[must_use]
pub fn native_module_name(suffix: &str) -> String {
    format!("{MODULE_NAMESPACE}_{suffix}")
}

/// File name of the runtime executable under `bin/`.
#[must_use]
pub const fn executable_file_name() -> &'static str {
    if cfg!(windows) { "wiltonw.exe" } else { "wilton" }
}
