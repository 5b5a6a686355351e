//! Lifecycle state machine guarding `init`, `shutdown`, and `call`.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::bootstrap::{EmbeddedRuntime, bootstrap_observed};
use crate::environment::{EnvironmentSource, ProcessEnvironment};
use crate::error::{BootstrapError, CallError, EmbedError, ParameterError, Stage};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::host::{CallDispatcher, HostBinder};
use crate::native::NativeHostBinder;
use crate::params::InitRequest;
use crate::platform::PlatformInit;

/// Lifecycle of the embedded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// No successful `init` yet, or shut down since.
    Uninitialized = 0,
    /// `init` is running.
    Initializing = 1,
    /// Every module is active.
    Ready = 2,
    /// `shutdown` is running.
    ShuttingDown = 3,
    /// The call-dispatch subsystem accepted a configuration but a later step
    /// failed. The subsystem cannot be configured again in this process.
    Faulted = 4,
}

impl LifecycleState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Initializing,
            2 => Self::Ready,
            3 => Self::ShuttingDown,
            4 => Self::Faulted,
            _ => Self::Uninitialized,
        }
    }

    /// Lower-case state label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::ShuttingDown => "shutting_down",
            Self::Faulted => "faulted",
        }
    }
}

/// Owns the collaborators and lifecycle of one embedded runtime.
pub struct Embedder {
    state: AtomicU8,
    binder: Box<dyn HostBinder>,
    environment: Box<dyn EnvironmentSource>,
    reporter: Arc<dyn HealthReporter>,
    platform: PlatformInit,
    dispatcher: Mutex<Option<Arc<dyn CallDispatcher>>>,
    runtime: Mutex<Option<EmbeddedRuntime>>,
}

impl Embedder {
    /// Creates an embedder from its collaborators.
    #[must_use]
    pub fn new(
        binder: impl HostBinder + 'static,
        environment: impl EnvironmentSource + 'static,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
            binder: Box::new(binder),
            environment: Box::new(environment),
            reporter,
            platform: PlatformInit::new(),
            dispatcher: Mutex::new(None),
            runtime: Mutex::new(None),
        }
    }

    /// Embedder backed by the runtime's shared libraries and the process
    /// environment.
    #[must_use]
    pub fn native() -> Self {
        Self::new(
            NativeHostBinder,
            ProcessEnvironment,
            Arc::new(StructuredHealthReporter::new()),
        )
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Bootstraps the runtime for an already validated request.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] for the first failing stage, including
    /// [`EmbedError::AlreadyInitialized`] when the runtime is not
    /// uninitialised. A failure before the hand-off returns the runtime to
    /// [`LifecycleState::Uninitialized`]; a failure after it leaves the
    /// runtime [`LifecycleState::Faulted`].
    pub fn init(&self, request: &InitRequest) -> Result<(), BootstrapError> {
        self.init_with(|| Ok(request.clone()))
    }

    /// Bootstraps the runtime from raw argument bytes.
    ///
    /// # Errors
    ///
    /// As [`Embedder::init`], plus [`ParameterError`] for invalid arguments.
    pub fn init_from_bytes(
        &self,
        runtime_home: &[u8],
        script_engine: &[u8],
        app_dir: &[u8],
    ) -> Result<(), BootstrapError> {
        self.init_with(|| InitRequest::from_bytes(runtime_home, script_engine, app_dir))
    }

    fn init_with(
        &self,
        request: impl FnOnce() -> Result<InitRequest, ParameterError>,
    ) -> Result<(), BootstrapError> {
        if let Err(raw) = self.state.compare_exchange(
            LifecycleState::Uninitialized as u8,
            LifecycleState::Initializing as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            let state = LifecycleState::from_raw(raw).as_str();
            let error =
                BootstrapError::new(Stage::Lifecycle, EmbedError::AlreadyInitialized { state });
            self.reporter.init_failed(&error);
            return Err(error);
        }

        let request = match request() {
            Ok(request) => request,
            Err(source) => {
                let error = BootstrapError::new(Stage::Parameters, source);
                self.reporter.init_failed(&error);
                self.set_state(LifecycleState::Uninitialized);
                return Err(error);
            }
        };

        let mut handed_off = false;
        let result = bootstrap_observed(
            &request,
            self.binder.as_ref(),
            self.environment.as_ref(),
            &self.platform,
            self.reporter.as_ref(),
            |dispatcher| {
                handed_off = true;
                *lock(&self.dispatcher) = Some(Arc::clone(dispatcher));
            },
        );
        match result {
            Ok(runtime) => {
                *lock(&self.runtime) = Some(runtime);
                self.set_state(LifecycleState::Ready);
                Ok(())
            }
            Err(error) if handed_off => {
                self.set_state(LifecycleState::Faulted);
                Err(error)
            }
            Err(error) => {
                self.set_state(LifecycleState::Uninitialized);
                Err(error)
            }
        }
    }

    /// Requests shutdown. Always succeeds and tears nothing down.
    pub fn shutdown(&self) {
        self.reporter.shutdown();
        let from_ready = self.state.compare_exchange(
            LifecycleState::Ready as u8,
            LifecycleState::ShuttingDown as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if from_ready.is_ok() {
            self.set_state(LifecycleState::Uninitialized);
        }
    }

    /// Passes a call through to the call-dispatch subsystem.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::NotInitialized`] before any configuration has been
    /// handed off, or the subsystem's own message.
    pub fn call(&self, name: &[u8], payload: &[u8]) -> Result<Vec<u8>, CallError> {
        let dispatcher = lock(&self.dispatcher).clone();
        let dispatcher = dispatcher.ok_or(CallError::NotInitialized)?;
        dispatcher.call(name, payload).map_err(CallError::Dispatch)
    }

    /// Application name of the last successful `init`.
    #[must_use]
    pub fn app_name(&self) -> Option<String> {
        lock(&self.runtime)
            .as_ref()
            .map(|runtime| runtime.app_name().to_owned())
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
