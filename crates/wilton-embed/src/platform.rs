//! Process-wide platform set-up performed once the script engine is ready.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::ActivationError;

/// Native signal-handling subsystem.
pub trait SignalSubsystem: Send + Sync {
    /// Installs the process signal handlers.
    ///
    /// # Errors
    ///
    /// Returns the subsystem's own message when installation fails.
    fn initialize(&self) -> Result<(), String>;
}

/// Guards the process-global side effects of signal set-up.
///
/// The first successful [`PlatformInit::initialize`] installs signal handlers
/// and, on Windows, suppresses critical-error dialogs. Later calls are no-ops.
#[derive(Debug, Default)]
pub struct PlatformInit {
    initialized: AtomicBool,
}

impl PlatformInit {
    /// Creates a guard that has not run yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
        }
    }

    /// Runs the platform set-up unless it already succeeded.
    ///
    /// Returns `true` when this call performed the set-up.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::Signals`] when the signal subsystem rejects
    /// initialisation. The guard is released so a later call may retry.
    pub fn initialize(&self, signals: &dyn SignalSubsystem) -> Result<bool, ActivationError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            debug!("platform already initialised, skipping signal set-up");
            return Ok(false);
        }
        if let Err(message) = signals.initialize() {
            self.initialized.store(false, Ordering::Release);
            return Err(ActivationError::Signals(message));
        }
        suppress_error_dialogs();
        Ok(true)
    }

    /// Returns `true` once the set-up has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

#[cfg(windows)]
fn suppress_error_dialogs() {
    const SEM_FAILCRITICALERRORS: u32 = 0x0001;
    const SEM_NOGPFAULTERRORBOX: u32 = 0x0002;

    #[link(name = "kernel32")]
    unsafe extern "system" {
        fn SetErrorMode(mode: u32) -> u32;
    }

    // SAFETY: `SetErrorMode` only replaces the process error mode flags.
    unsafe {
        SetErrorMode(SEM_FAILCRITICALERRORS | SEM_NOGPFAULTERRORBOX);
    }
}

#[cfg(not(windows))]
const fn suppress_error_dialogs() {}
