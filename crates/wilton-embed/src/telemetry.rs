//! Structured telemetry initialisation for the embed layer.
//!
//! The embed layer lives inside a foreign host process that may already own a
//! global `tracing` subscriber. In that case events flow into the host's
//! subscriber and no error is raised.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use wilton_embed_config::{LogFormat, LoggingSettings};

static TELEMETRY_GUARD: OnceCell<TelemetryHandle> = OnceCell::new();

/// Outcome of telemetry initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryHandle {
    /// The embed layer installed the global subscriber.
    Installed,
    /// The host already installed one; events are routed there.
    External,
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Later calls return the first outcome without touching global state.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the first call carries an invalid
/// filter expression.
pub fn initialise(settings: &LoggingSettings) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(settings))
        .copied()
}

fn install_subscriber(settings: &LoggingSettings) -> Result<TelemetryHandle, TelemetryError> {
    let filter = EnvFilter::try_new(settings.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match settings.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => Ok(TelemetryHandle::Installed),
        Err(_) => Ok(TelemetryHandle::External),
    }
}
