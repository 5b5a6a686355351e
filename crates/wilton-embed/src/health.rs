//! Structured health reporting for embed lifecycle events.

use std::sync::Arc;

use crate::error::{BootstrapError, ModuleLoadError};
use crate::params::ScriptEngine;

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before argument validation begins.
    fn init_starting(&self);

    /// Invoked after every module has been activated.
    fn init_succeeded(&self, app_name: &str, engine: &ScriptEngine);

    /// Invoked when `init` fails.
    fn init_failed(&self, error: &BootstrapError);

    /// Invoked before a native module is loaded.
    fn module_loading(&self, module: &str);

    /// Invoked after a native module loads.
    fn module_loaded(&self, module: &str);

    /// Invoked when a native module fails to load.
    fn module_failed(&self, error: &ModuleLoadError);

    /// Invoked when the host requests shutdown.
    fn shutdown(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn init_starting(&self) {
        (**self).init_starting();
    }

    fn init_succeeded(&self, app_name: &str, engine: &ScriptEngine) {
        (**self).init_succeeded(app_name, engine);
    }

    fn init_failed(&self, error: &BootstrapError) {
        (**self).init_failed(error);
    }

    fn module_loading(&self, module: &str) {
        (**self).module_loading(module);
    }

    fn module_loaded(&self, module: &str) {
        (**self).module_loaded(module);
    }

    fn module_failed(&self, error: &ModuleLoadError) {
        (**self).module_failed(error);
    }

    fn shutdown(&self) {
        (**self).shutdown();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn init_starting(&self) {
        tracing::info!(
            target: "wilton_embed::health",
            event = "init_starting",
            "starting embedded runtime bootstrap"
        );
    }

    fn init_succeeded(&self, app_name: &str, engine: &ScriptEngine) {
        tracing::info!(
            target: "wilton_embed::health",
            event = "init_succeeded",
            app = %app_name,
            engine = %engine,
            "embedded runtime ready"
        );
    }

    fn init_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: "wilton_embed::health",
            event = "init_failed",
            stage = %error.stage(),
            error = %error,
            "embedded runtime bootstrap failed"
        );
    }

    fn module_loading(&self, module: &str) {
        tracing::info!(
            target: "wilton_embed::health",
            event = "module_loading",
            module = %module,
            "loading native module"
        );
    }

    fn module_loaded(&self, module: &str) {
        tracing::info!(
            target: "wilton_embed::health",
            event = "module_loaded",
            module = %module,
            "native module loaded"
        );
    }

    fn module_failed(&self, error: &ModuleLoadError) {
        tracing::error!(
            target: "wilton_embed::health",
            event = "module_failed",
            module = %error.module(),
            message = %error.message(),
            "native module failed to load"
        );
    }

    fn shutdown(&self) {
        tracing::info!(
            target: "wilton_embed::health",
            event = "shutdown",
            "embedded runtime shutdown requested"
        );
    }
}
