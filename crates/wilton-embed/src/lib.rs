//! Embeds a Wilton script runtime inside a foreign host process.
//!
//! The crate bootstraps the runtime from three explicit-length arguments: the
//! runtime home, the script engine to activate, and the application
//! directory. Bootstrap validates both directories, discovers the bundled and
//! vendor script packages, snapshots the process environment, assembles one
//! JSON configuration document, and hands it to the runtime's call-dispatch
//! subsystem. Only after the hand-off succeeds are the native modules
//! activated, in a fixed order: logging, loader, the script engine, and
//! finally signal handling.
//!
//! The native collaborators sit behind traits ([`CallDispatcher`],
//! [`ModuleRegistry`], [`SignalSubsystem`], [`HostBinder`]) so the whole
//! sequence can be driven in-process by tests. [`Embedder`] wraps the sequence
//! in a lifecycle state machine and the `ffi` module exports it as a C ABI.

mod activation;
mod bootstrap;
pub mod boundary;
mod discovery;
mod document;
mod environment;
mod error;
pub mod ffi;
mod health;
mod host;
mod identity;
mod lifecycle;
mod native;
mod params;
mod paths;
mod platform;
mod telemetry;

pub use activation::{ActivationPlan, ActivationStep, ModuleActivator, ModuleRegistry};
pub use bootstrap::{EmbeddedRuntime, bootstrap_with};
pub use discovery::{
    ModuleLocator, ModulePaths, load_bundled_packages, read_package_manifest,
    scan_vendor_directory,
};
pub use document::{CompileTimeOs, ConfigurationDocument, RequireJs, assemble};
pub use environment::{EnvironmentSnapshot, EnvironmentSource, ProcessEnvironment};
pub use error::{
    ActivationError, BootstrapError, CallError, ConfigurationError, DelegateError,
    DiscoveryError, EmbedError, HostError, ModuleLoadError, ParameterError, Stage,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use host::{CallDispatcher, Host, HostBinder};
pub use identity::{ApplicationIdentity, resolve as resolve_identity};
pub use lifecycle::{Embedder, LifecycleState};
pub use native::{NativeCore, NativeHostBinder, NativeSignals};
pub use params::{InitRequest, ScriptEngine};
pub use paths::validate as validate_paths;
pub use platform::{PlatformInit, SignalSubsystem};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
