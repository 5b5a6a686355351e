//! Shared, ordered record of collaborator invocations.

use std::sync::{Arc, Mutex};

/// Ordered log shared between the module registry and signal doubles so tests
/// can assert the relative order of module loads and signal set-up.
#[derive(Debug, Clone, Default)]
pub struct CallJournal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallJournal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .expect("call journal mutex poisoned")
            .push(entry.into());
    }

    /// Captures a copy of the recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("call journal mutex poisoned")
            .clone()
    }

    /// Position of `entry`, if it was recorded.
    #[must_use]
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|recorded| recorded == entry)
    }
}
