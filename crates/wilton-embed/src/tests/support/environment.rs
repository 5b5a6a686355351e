//! Fixed environment table for deterministic snapshots.

use crate::environment::EnvironmentSource;

#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    entries: Vec<Vec<u8>>,
}

impl StaticEnvironment {
    #[must_use]
    pub fn new<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<[u8]>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| entry.as_ref().to_vec())
                .collect(),
        }
    }
}

impl EnvironmentSource for StaticEnvironment {
    fn entries(&self) -> Vec<Vec<u8>> {
        self.entries.clone()
    }
}
