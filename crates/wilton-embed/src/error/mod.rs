//! Error taxonomy of the embedding layer.
//!
//! Components return narrow error enums; [`EmbedError`] groups them by kind
//! and [`BootstrapError`] records which bootstrap stage raised the failure so
//! the C ABI boundary can render a traceable message.

use std::fmt;
use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;
use wilton_embed_config::{AppConfigError, LayoutError};

use crate::telemetry::TelemetryError;

/// Invalid arguments passed to `init`. Detected before any I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// A required pointer was null.
    #[error("Null '{name}' parameter specified")]
    Null {
        /// Parameter name.
        name: &'static str,
    },
    /// A length was not a positive 16-bit count.
    #[error("Invalid '{name}_len' parameter specified: [{length}]")]
    InvalidLength {
        /// Parameter name.
        name: &'static str,
        /// Length supplied by the caller.
        length: i64,
    },
    /// The bytes are not valid UTF-8.
    #[error("Invalid '{name}' parameter specified: value is not valid UTF-8")]
    NotUtf8 {
        /// Parameter name.
        name: &'static str,
    },
    /// The script engine name cannot form a native module name.
    #[error("Invalid 'script_engine' parameter specified: [{value}]")]
    InvalidScriptEngine {
        /// Rejected engine identifier.
        value: String,
    },
}

/// Invalid runtime home, application directory, or environment.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The runtime home is missing or not a directory.
    #[error("Specified WILTON_HOME directory not found, path: [{path}]")]
    RuntimeHomeNotFound {
        /// Path supplied by the caller.
        path: Utf8PathBuf,
    },
    /// The application directory is missing or not a directory.
    #[error("Specified application directory not found, path: [{path}]")]
    AppDirNotFound {
        /// Path supplied by the caller.
        path: Utf8PathBuf,
    },
    /// A layout path could not be resolved.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// The application descriptor is unreadable or incomplete.
    #[error(transparent)]
    AppConfig(#[from] AppConfigError),
    /// No application name could be derived from the directory path.
    #[error("unable to derive application name from directory, path: [{path}]")]
    UnnamedAppDir {
        /// Path supplied by the caller.
        path: Utf8PathBuf,
    },
    /// An environment entry split into too few fragments.
    #[error("Invalid environment variable vector specified, parts count: [{parts}]")]
    EnvironmentEntry {
        /// Number of fragments produced by the split.
        parts: usize,
    },
    /// The configuration document could not be serialised.
    #[error("failed to serialise runtime configuration: {0}")]
    Document(#[source] serde_json::Error),
    /// The embed layer's own telemetry could not be configured.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Failure while reading the bundled package manifest or the vendor directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The archive reader module could not be activated.
    #[error(transparent)]
    ArchiveModule(#[from] ModuleLoadError),
    /// The standard library archive could not be opened.
    #[error("unable to open standard library archive, file: [{path}]: {source}")]
    ArchiveOpen {
        /// Archive path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The archive is not a readable zip file.
    #[error("unable to read standard library archive, file: [{path}]: {source}")]
    ArchiveRead {
        /// Archive path.
        path: Utf8PathBuf,
        /// Underlying archive error.
        #[source]
        source: zip::result::ZipError,
    },
    /// The manifest entry is absent from the archive.
    #[error("Unable to load 'wilton-packages.json', ZIP entry: [{entry}], file: [{path}]")]
    ManifestMissing {
        /// Manifest entry name.
        entry: &'static str,
        /// Archive path.
        path: Utf8PathBuf,
    },
    /// The manifest entry is not valid JSON.
    #[error("unable to parse package manifest, ZIP entry: [{entry}], file: [{path}]: {source}")]
    ManifestParse {
        /// Manifest entry name.
        entry: &'static str,
        /// Archive path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The manifest entry holds JSON that is not an array.
    #[error("package manifest must be a JSON array, ZIP entry: [{entry}], found: [{found}]")]
    ManifestNotArray {
        /// Manifest entry name.
        entry: &'static str,
        /// JSON type that was found instead.
        found: &'static str,
    },
    /// The vendor library directory could not be listed.
    #[error("unable to list vendor library directory, path: [{path}]: {source}")]
    VendorDirectory {
        /// Vendor directory path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A native module failed to load. The message is the loader's, unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ModuleLoadError {
    module: String,
    message: String,
}

impl ModuleLoadError {
    /// Creates an error for `module` carrying the loader's message.
    #[must_use]
    pub fn new(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Module that failed to load.
    #[must_use]
    pub fn module(&self) -> &str {
        self.module.as_str()
    }

    /// Loader message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Failure in the fixed module activation sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// A module in the sequence failed to load.
    #[error(transparent)]
    Module(#[from] ModuleLoadError),
    /// The signal subsystem rejected initialisation.
    #[error("{0}")]
    Signals(String),
}

/// Failure reported by the call-dispatch subsystem, passed through verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DelegateError(pub String);

/// Native collaborators could not be bound.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HostError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Every failure `init` can report, grouped by kind.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Invalid arguments.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// Invalid paths, descriptor, or environment.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Package or vendor discovery failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// Module activation failed.
    #[error(transparent)]
    Activation(#[from] ActivationError),
    /// The call-dispatch subsystem rejected the configuration.
    #[error(transparent)]
    Delegate(#[from] DelegateError),
    /// Native collaborators could not be bound.
    #[error(transparent)]
    Host(#[from] HostError),
    /// `init` was called while the runtime was not uninitialised.
    #[error("runtime already initialised (state: {state})")]
    AlreadyInitialized {
        /// State observed when the call was rejected.
        state: &'static str,
    },
}

/// Bootstrap step in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lifecycle state check.
    Lifecycle,
    /// Argument validation.
    Parameters,
    /// Runtime home and application directory checks.
    ValidatePaths,
    /// Binding the native collaborators.
    BindHost,
    /// Application name resolution.
    ResolveIdentity,
    /// Embed-layer telemetry set-up.
    Telemetry,
    /// Bundled package discovery.
    BundledPackages,
    /// Vendor directory scan.
    VendorScan,
    /// Environment capture.
    Environment,
    /// Document assembly and serialisation.
    AssembleConfig,
    /// Hand-off to the call-dispatch subsystem.
    DelegateInit,
    /// Module activation.
    ActivateModules,
}

impl Stage {
    /// Returns the canonical stage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lifecycle => "lifecycle",
            Self::Parameters => "parameters",
            Self::ValidatePaths => "validate_paths",
            Self::BindHost => "bind_host",
            Self::ResolveIdentity => "resolve_identity",
            Self::Telemetry => "telemetry",
            Self::BundledPackages => "bundled_packages",
            Self::VendorScan => "vendor_scan",
            Self::Environment => "environment",
            Self::AssembleConfig => "assemble_config",
            Self::DelegateInit => "delegate_init",
            Self::ActivateModules => "activate_modules",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A failure annotated with the stage that raised it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct BootstrapError {
    stage: Stage,
    #[source]
    error: EmbedError,
}

impl BootstrapError {
    /// Annotates `error` with `stage`.
    #[must_use]
    pub fn new(stage: Stage, error: impl Into<EmbedError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }

    /// Stage that raised the failure.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Underlying failure.
    #[must_use]
    pub const fn error(&self) -> &EmbedError {
        &self.error
    }
}

/// Failure of a pass-through invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    /// No call-dispatch subsystem has accepted a configuration yet.
    #[error("wilton embed runtime is not initialised")]
    NotInitialized,
    /// The call-dispatch subsystem reported a failure.
    #[error("{0}")]
    Dispatch(String),
}
