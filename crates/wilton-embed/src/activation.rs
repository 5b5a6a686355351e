//! Ordered activation of the runtime's native modules.
//!
//! The order is fixed: logging has to be available before the loader emits
//! anything, the loader before the script engine registers itself through it,
//! and the engine before signal handlers that may interrupt script execution.

use std::sync::Arc;

use camino::Utf8Path;
use wilton_embed_config::native_module_name;

use crate::error::{ActivationError, ModuleLoadError};
use crate::health::HealthReporter;
use crate::params::ScriptEngine;
use crate::platform::{PlatformInit, SignalSubsystem};

/// Capability to load a native module by name from a search root.
pub trait ModuleRegistry: Send + Sync {
    /// Loads `name` from `search_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ModuleLoadError`] carrying the loader's message unmodified.
    fn load(&self, name: &str, search_root: &Utf8Path) -> Result<(), ModuleLoadError>;
}

impl<T> ModuleRegistry for Arc<T>
where
    T: ModuleRegistry + ?Sized,
{
    fn load(&self, name: &str, search_root: &Utf8Path) -> Result<(), ModuleLoadError> {
        (**self).load(name, search_root)
    }
}

/// Single step of an [`ActivationPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationStep {
    /// Load the named native module.
    Module(String),
    /// Load the signal module and install signal handlers.
    Signals,
}

/// Fixed activation sequence for one script engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationPlan {
    steps: Vec<ActivationStep>,
}

impl ActivationPlan {
    /// Plan for `engine`: logging, loader, the engine, then signals.
    #[must_use]
    pub fn for_engine(engine: &ScriptEngine) -> Self {
        Self {
            steps: vec![
                ActivationStep::Module(native_module_name("logging")),
                ActivationStep::Module(native_module_name("loader")),
                ActivationStep::Module(native_module_name(engine.as_str())),
                ActivationStep::Signals,
            ],
        }
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[ActivationStep] {
        &self.steps
    }
}

/// Runs an [`ActivationPlan`] against the bound collaborators.
pub struct ModuleActivator<'a> {
    registry: &'a dyn ModuleRegistry,
    signals: &'a dyn SignalSubsystem,
    platform: &'a PlatformInit,
    reporter: &'a dyn HealthReporter,
}

impl<'a> ModuleActivator<'a> {
    /// Creates an activator.
    #[must_use]
    pub fn new(
        registry: &'a dyn ModuleRegistry,
        signals: &'a dyn SignalSubsystem,
        platform: &'a PlatformInit,
        reporter: &'a dyn HealthReporter,
    ) -> Self {
        Self {
            registry,
            signals,
            platform,
            reporter,
        }
    }

    /// Executes every step, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError`] for the first step that fails; later steps
    /// are not attempted.
    pub fn activate(
        &self,
        plan: &ActivationPlan,
        search_root: &Utf8Path,
    ) -> Result<(), ActivationError> {
        for step in plan.steps() {
            match step {
                ActivationStep::Module(name) => self.load(name, search_root)?,
                ActivationStep::Signals => {
                    self.load(&native_module_name("signal"), search_root)?;
                    self.platform.initialize(self.signals)?;
                }
            }
        }
        Ok(())
    }

    fn load(&self, name: &str, search_root: &Utf8Path) -> Result<(), ModuleLoadError> {
        self.reporter.module_loading(name);
        match self.registry.load(name, search_root) {
            Ok(()) => {
                self.reporter.module_loaded(name);
                Ok(())
            }
            Err(error) => {
                self.reporter.module_failed(&error);
                Err(error)
            }
        }
    }
}
