//! Scenario world shared across the bootstrap BDD steps.

use std::cell::RefCell;
use std::sync::Arc;

use crate::boundary;
use crate::error::BootstrapError;
use crate::host::Host;
use crate::lifecycle::Embedder;
use crate::params::InitRequest;

use super::binder::StaticBinder;
use super::dispatcher::RecordingDispatcher;
use super::environment::StaticEnvironment;
use super::fixtures::{DEFAULT_MANIFEST, RuntimeFixture};
use super::journal::CallJournal;
use super::registry::RecordingModuleRegistry;
use super::reporter::RecordingHealthReporter;
use super::signals::RecordingSignals;

/// Which directories the next `init` request points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    Valid,
    MissingHome,
    FileAsAppDir,
}

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    pub fixture: RuntimeFixture,
    pub journal: CallJournal,
    pub registry: RecordingModuleRegistry,
    pub signals: RecordingSignals,
    pub dispatcher: RecordingDispatcher,
    pub reporter: Arc<RecordingHealthReporter>,
    pub embedder: Embedder,
    shape: RequestShape,
    results: Vec<Result<(), BootstrapError>>,
}

impl TestWorld {
    /// Builds a world around a fresh runtime home.
    #[must_use]
    pub fn new() -> Self {
        let journal = CallJournal::default();
        let registry = RecordingModuleRegistry::with_journal(journal.clone());
        let signals = RecordingSignals::with_journal(journal.clone());
        let dispatcher = RecordingDispatcher::default();
        let reporter = Arc::new(RecordingHealthReporter::default());
        let host = Host::new(
            Arc::new(dispatcher.clone()),
            Arc::new(registry.clone()),
            Arc::new(signals.clone()),
        );
        let embedder = Embedder::new(
            StaticBinder::new(host),
            StaticEnvironment::new(["B=2", "A=1=x", "INVALID=ab\u{fffd}"]),
            reporter.clone(),
        );
        Self {
            fixture: RuntimeFixture::with_manifest(DEFAULT_MANIFEST),
            journal,
            registry,
            signals,
            dispatcher,
            reporter,
            embedder,
            shape: RequestShape::Valid,
            results: Vec::new(),
        }
    }

    /// Points the next request at different directories.
    pub fn use_request_shape(&mut self, shape: RequestShape) {
        self.shape = shape;
    }

    fn request(&self, engine: &str) -> InitRequest {
        match self.shape {
            RequestShape::Valid => self.fixture.request(engine),
            RequestShape::MissingHome => self.fixture.request_with_missing_home(engine),
            RequestShape::FileAsAppDir => self.fixture.request_with_file_app(engine),
        }
    }

    /// Runs `init` once more.
    pub fn init(&mut self, engine: &str) {
        let request = self.request(engine);
        let result = self.embedder.init(&request);
        self.results.push(result);
    }

    /// Result of the latest `init`.
    #[must_use]
    pub fn last_result(&self) -> Option<&Result<(), BootstrapError>> {
        self.results.last()
    }

    /// Error of the latest `init`, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&BootstrapError> {
        self.last_result().and_then(|result| result.as_ref().err())
    }

    /// Boundary rendering of the latest failure.
    #[must_use]
    pub fn rendered_error(&self) -> Option<String> {
        self.last_error().map(boundary::render)
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture constructor used by the scenario bindings.
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
