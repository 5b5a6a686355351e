//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::sync::Mutex;

use crate::error::{BootstrapError, ModuleLoadError, Stage};
use crate::health::HealthReporter;
use crate::params::ScriptEngine;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started.
    InitStarting,
    /// Bootstrap completed for the named application.
    InitSucceeded { app: String, engine: String },
    /// Bootstrap failed at a stage.
    InitFailed { stage: Stage, message: String },
    /// Module load requested.
    ModuleLoading(String),
    /// Module loaded.
    ModuleLoaded(String),
    /// Module failed to load.
    ModuleFailed { module: String, message: String },
    /// Shutdown requested.
    Shutdown,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    pub fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn init_starting(&self) {
        self.record(HealthEvent::InitStarting);
    }

    fn init_succeeded(&self, app_name: &str, engine: &ScriptEngine) {
        self.record(HealthEvent::InitSucceeded {
            app: app_name.to_owned(),
            engine: engine.as_str().to_owned(),
        });
    }

    fn init_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::InitFailed {
            stage: error.stage(),
            message: error.to_string(),
        });
    }

    fn module_loading(&self, module: &str) {
        self.record(HealthEvent::ModuleLoading(module.to_owned()));
    }

    fn module_loaded(&self, module: &str) {
        self.record(HealthEvent::ModuleLoaded(module.to_owned()));
    }

    fn module_failed(&self, error: &ModuleLoadError) {
        self.record(HealthEvent::ModuleFailed {
            module: error.module().to_owned(),
            message: error.message().to_owned(),
        });
    }

    fn shutdown(&self) {
        self.record(HealthEvent::Shutdown);
    }
}
