//! Test module registry: records load requests and supports injected failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use camino::{Utf8Path, Utf8PathBuf};

use crate::activation::ModuleRegistry;
use crate::error::ModuleLoadError;

use super::journal::CallJournal;

/// Module registry that records requests and supports injected failures.
#[derive(Clone, Default)]
pub struct RecordingModuleRegistry {
    journal: CallJournal,
    state: Arc<Mutex<RegistryState>>,
}

impl RecordingModuleRegistry {
    /// Builds a registry writing into `journal`.
    #[must_use]
    pub fn with_journal(journal: CallJournal) -> Self {
        Self {
            journal,
            state: Arc::default(),
        }
    }

    /// Configures the registry to fail for the specified module.
    pub fn fail_on(&self, module: impl Into<String>, message: impl Into<String>) {
        let mut state = self.state.lock().expect("registry state mutex poisoned");
        state.failures.insert(module.into(), message.into());
    }

    /// Returns every module that was requested, in order.
    #[must_use]
    pub fn recorded_loads(&self) -> Vec<String> {
        let state = self.state.lock().expect("registry state mutex poisoned");
        state.loads.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Returns the search roots passed alongside each request.
    #[must_use]
    pub fn recorded_roots(&self) -> Vec<Utf8PathBuf> {
        let state = self.state.lock().expect("registry state mutex poisoned");
        state.loads.iter().map(|(_, root)| root.clone()).collect()
    }
}

impl ModuleRegistry for RecordingModuleRegistry {
    fn load(&self, name: &str, search_root: &Utf8Path) -> Result<(), ModuleLoadError> {
        self.journal.record(name);
        let failure = {
            let mut state = self.state.lock().expect("registry state mutex poisoned");
            state.loads.push((name.to_owned(), search_root.to_path_buf()));
            state.failures.get(name).cloned()
        };
        match failure {
            Some(message) => Err(ModuleLoadError::new(name, message)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    loads: Vec<(String, Utf8PathBuf)>,
    failures: HashMap<String, String>,
}
