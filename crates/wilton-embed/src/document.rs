//! The configuration document handed to the call-dispatch subsystem.

use serde::Serialize;
use serde_json::Value;
use wilton_embed_config::RuntimeLayout;

use crate::discovery::{ModuleLocator, ModulePaths};
use crate::environment::EnvironmentSnapshot;
use crate::error::ConfigurationError;
use crate::params::ScriptEngine;

/// Platform family the embed layer was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileTimeOs {
    /// Android.
    Android,
    /// Windows.
    Windows,
    /// Linux and other Unix targets.
    Linux,
    /// macOS.
    Macos,
}

impl CompileTimeOs {
    /// Tag chosen when this crate was built.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else {
            Self::Linux
        }
    }

    /// Lower-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Macos => "macos",
        }
    }
}

/// Module-resolution section consumed by the script module loader.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequireJs {
    wait_seconds: u32,
    enforce_define: bool,
    node_id_compat: bool,
    base_url: ModuleLocator,
    paths: ModulePaths,
    packages: Vec<Value>,
}

impl RequireJs {
    /// Module path mapping.
    #[must_use]
    pub const fn paths(&self) -> &ModulePaths {
        &self.paths
    }

    /// Bundled package descriptors.
    #[must_use]
    pub fn packages(&self) -> &[Value] {
        &self.packages
    }

    /// Locator of the standard library archive.
    #[must_use]
    pub const fn base_url(&self) -> &ModuleLocator {
        &self.base_url
    }
}

/// Complete runtime configuration, built once per `init`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDocument {
    default_script_engine: String,
    wilton_executable: String,
    wilton_home: String,
    wilton_version: String,
    require_js: RequireJs,
    environment_variables: EnvironmentSnapshot,
    #[serde(rename = "compileTimeOS")]
    compile_time_os: CompileTimeOs,
}

impl ConfigurationDocument {
    /// Serialises the document to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Document`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string(self).map_err(ConfigurationError::Document)
    }

    /// Module-resolution section.
    #[must_use]
    pub const fn require_js(&self) -> &RequireJs {
        &self.require_js
    }

    /// Captured environment.
    #[must_use]
    pub const fn environment(&self) -> &EnvironmentSnapshot {
        &self.environment_variables
    }

    /// Runtime home with a trailing slash.
    #[must_use]
    pub fn wilton_home(&self) -> &str {
        self.wilton_home.as_str()
    }
}

/// Builds the document from the values gathered during bootstrap.
#[must_use]
pub fn assemble(
    layout: &RuntimeLayout,
    engine: &ScriptEngine,
    packages: Vec<Value>,
    environment: EnvironmentSnapshot,
    paths: ModulePaths,
    version: &str,
) -> ConfigurationDocument {
    ConfigurationDocument {
        default_script_engine: engine.as_str().to_owned(),
        wilton_executable: layout.executable().to_string(),
        wilton_home: layout.home_dir_string(),
        wilton_version: version.to_owned(),
        require_js: RequireJs {
            wait_seconds: 0,
            enforce_define: true,
            node_id_compat: true,
            base_url: ModuleLocator::archive(layout.stdlib_archive()),
            paths,
            packages,
        },
        environment_variables: environment,
        compile_time_os: CompileTimeOs::current(),
    }
}
