//! Test harness utilities for the embed bootstrap suites.

mod binder;
mod dispatcher;
mod environment;
mod fixtures;
mod journal;
mod registry;
mod reporter;
mod signals;
mod world;

pub use binder::{FailingBinder, StaticBinder};
pub use dispatcher::{MockDispatcher, RecordingDispatcher};
pub use environment::StaticEnvironment;
pub use fixtures::{DEFAULT_MANIFEST, RuntimeFixture, runtime, write_archive};
pub use journal::CallJournal;
pub use registry::RecordingModuleRegistry;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use signals::{RecordingSignals, SIGNAL_INIT};
pub use world::{RequestShape, TestWorld, world};
