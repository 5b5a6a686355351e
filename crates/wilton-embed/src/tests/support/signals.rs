//! Test signal subsystem that records initialisation requests.

use std::sync::{Arc, Mutex};

use crate::platform::SignalSubsystem;

use super::journal::CallJournal;

/// Journal entry recorded when signal handlers are installed.
pub const SIGNAL_INIT: &str = "signal_init";

#[derive(Clone, Default)]
pub struct RecordingSignals {
    journal: CallJournal,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingSignals {
    #[must_use]
    pub fn with_journal(journal: CallJournal) -> Self {
        Self {
            journal,
            failure: Arc::default(),
        }
    }

    /// Makes every later initialisation fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().expect("signals mutex poisoned") = Some(message.into());
    }

    /// Number of initialisation requests seen.
    #[must_use]
    pub fn initialisations(&self) -> usize {
        self.journal
            .entries()
            .iter()
            .filter(|entry| entry.as_str() == SIGNAL_INIT)
            .count()
    }
}

impl SignalSubsystem for RecordingSignals {
    fn initialize(&self) -> Result<(), String> {
        self.journal.record(SIGNAL_INIT);
        match self.failure.lock().expect("signals mutex poisoned").clone() {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}
