//! Call-dispatch doubles: a `mockall` mock and a recording stub.

use std::sync::{Arc, Mutex};

use mockall::mock;

use crate::error::DelegateError;
use crate::host::CallDispatcher;

mock! {
    pub Dispatcher {}

    impl CallDispatcher for Dispatcher {
        fn initialize(&self, config_json: &str) -> Result<(), DelegateError>;
        fn call(&self, name: &[u8], payload: &[u8]) -> Result<Vec<u8>, String>;
    }
}

/// Dispatcher that keeps every configuration it receives and echoes calls.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    state: Arc<Mutex<DispatcherState>>,
}

impl RecordingDispatcher {
    /// Makes the next hand-offs fail with `message`.
    pub fn reject_with(&self, message: impl Into<String>) {
        let mut state = self.state.lock().expect("dispatcher mutex poisoned");
        state.rejection = Some(message.into());
    }

    /// Configurations received so far.
    #[must_use]
    pub fn configs(&self) -> Vec<String> {
        let state = self.state.lock().expect("dispatcher mutex poisoned");
        state.configs.clone()
    }

    /// Last configuration parsed as JSON.
    #[must_use]
    pub fn last_config(&self) -> Option<serde_json::Value> {
        self.configs()
            .last()
            .map(|raw| serde_json::from_str(raw).expect("configuration should be JSON"))
    }
}

impl CallDispatcher for RecordingDispatcher {
    fn initialize(&self, config_json: &str) -> Result<(), DelegateError> {
        let mut state = self.state.lock().expect("dispatcher mutex poisoned");
        state.configs.push(config_json.to_owned());
        match state.rejection.clone() {
            Some(message) => Err(DelegateError(message)),
            None => Ok(()),
        }
    }

    fn call(&self, name: &[u8], payload: &[u8]) -> Result<Vec<u8>, String> {
        let mut result = name.to_vec();
        result.push(b':');
        result.extend_from_slice(payload);
        Ok(result)
    }
}

#[derive(Default)]
struct DispatcherState {
    configs: Vec<String>,
    rejection: Option<String>,
}
