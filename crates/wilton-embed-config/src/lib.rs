//! Static configuration knowledge shared by the Wilton embedding layer.
//!
//! The embedding layer bootstraps a Wilton runtime inside a foreign host
//! process. Before any native module is activated it needs to agree with the
//! runtime installation on a fixed file layout: where native modules live,
//! where the bundled standard library archive sits, and where an application
//! may describe itself. This crate captures that layout together with the
//! embed layer's own logging settings so the bootstrap core never has to
//! hard-code paths inline.
//!
//! - [`RuntimeLayout`] derives every path under the runtime home.
//! - [`ApplicationLayout`] derives the application paths and reads the
//!   optional [`AppConfig`] descriptor.
//! - [`LoggingSettings`] and [`LogFormat`] describe how the embed layer's own
//!   telemetry is rendered.

mod app;
pub mod defaults;
mod layout;
mod logging;

pub use app::{AppConfig, AppConfigError};
pub use defaults::{
    ARCHIVE_PROTO_PREFIX, DEFAULT_LOG_FILTER, FILE_PROTO_PREFIX, MODULE_NAMESPACE,
    PACKAGES_MANIFEST_ENTRY, WILTON_VERSION, default_log_filter, default_log_format,
    native_module_name,
};
pub use layout::{ApplicationLayout, LayoutError, RuntimeLayout, full_path};
pub use logging::{LogFormat, LogFormatParseError, LoggingSettings};
