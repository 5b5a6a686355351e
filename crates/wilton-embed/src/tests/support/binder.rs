//! Host binders handing out pre-built collaborators.

use std::sync::{Arc, Mutex};

use wilton_embed_config::RuntimeLayout;

use crate::error::HostError;
use crate::host::{Host, HostBinder};

/// Binder returning the same [`Host`] on every call.
#[derive(Clone)]
pub struct StaticBinder {
    host: Host,
    binds: Arc<Mutex<usize>>,
}

impl StaticBinder {
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            host,
            binds: Arc::default(),
        }
    }

    /// Number of bind requests seen.
    #[must_use]
    pub fn binds(&self) -> usize {
        *self.binds.lock().expect("binder mutex poisoned")
    }
}

impl HostBinder for StaticBinder {
    fn bind(&self, _layout: &RuntimeLayout) -> Result<Host, HostError> {
        *self.binds.lock().expect("binder mutex poisoned") += 1;
        Ok(self.host.clone())
    }
}

/// Binder that cannot find the native core.
pub struct FailingBinder;

impl HostBinder for FailingBinder {
    fn bind(&self, layout: &RuntimeLayout) -> Result<Host, HostError> {
        Err(HostError::new(format!(
            "unable to open native module 'wilton_core' in [{}]",
            layout.bin_dir()
        )))
    }
}
