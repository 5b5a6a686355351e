//! Seams to the native collaborators the bootstrap drives.

use std::sync::Arc;

use wilton_embed_config::RuntimeLayout;

use crate::activation::ModuleRegistry;
use crate::error::{DelegateError, HostError};
use crate::platform::SignalSubsystem;

/// The call-dispatch subsystem that owns the configuration after hand-off.
pub trait CallDispatcher: Send + Sync {
    /// Hands the serialised configuration to the subsystem's initialiser.
    ///
    /// # Errors
    ///
    /// Returns [`DelegateError`] with the subsystem's message, unmodified.
    fn initialize(&self, config_json: &str) -> Result<(), DelegateError>;

    /// Invokes a named call with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the subsystem's error message when the call fails.
    fn call(&self, name: &[u8], payload: &[u8]) -> Result<Vec<u8>, String>;
}

/// Native collaborators bound for one runtime home.
#[derive(Clone)]
pub struct Host {
    dispatcher: Arc<dyn CallDispatcher>,
    registry: Arc<dyn ModuleRegistry>,
    signals: Arc<dyn SignalSubsystem>,
}

impl Host {
    /// Groups the collaborators.
    #[must_use]
    pub fn new(
        dispatcher: Arc<dyn CallDispatcher>,
        registry: Arc<dyn ModuleRegistry>,
        signals: Arc<dyn SignalSubsystem>,
    ) -> Self {
        Self {
            dispatcher,
            registry,
            signals,
        }
    }

    /// Call-dispatch subsystem.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<dyn CallDispatcher> {
        &self.dispatcher
    }

    /// Native module loader.
    #[must_use]
    pub fn registry(&self) -> &dyn ModuleRegistry {
        self.registry.as_ref()
    }

    /// Signal subsystem.
    #[must_use]
    pub fn signals(&self) -> &dyn SignalSubsystem {
        self.signals.as_ref()
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("Host").finish_non_exhaustive()
    }
}

/// Binds the native collaborators once the runtime home is known to exist.
pub trait HostBinder: Send + Sync {
    /// Produces the collaborators for `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when a collaborator cannot be bound.
    fn bind(&self, layout: &RuntimeLayout) -> Result<Host, HostError>;
}
