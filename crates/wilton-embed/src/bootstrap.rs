//! Embedded runtime bootstrap orchestration.

use std::sync::Arc;

use tracing::debug;
use wilton_embed_config::{ApplicationLayout, RuntimeLayout, WILTON_VERSION};

use crate::activation::{ActivationPlan, ModuleActivator};
use crate::discovery::{load_bundled_packages, scan_vendor_directory};
use crate::document;
use crate::environment::{EnvironmentSnapshot, EnvironmentSource};
use crate::error::{BootstrapError, ConfigurationError, EmbedError, Stage};
use crate::health::HealthReporter;
use crate::host::{CallDispatcher, Host, HostBinder};
use crate::identity;
use crate::params::{InitRequest, ScriptEngine};
use crate::paths;
use crate::platform::PlatformInit;
use crate::telemetry::{self, TelemetryHandle};

/// Result of a successful bootstrap invocation.
#[derive(Debug)]
pub struct EmbeddedRuntime {
    host: Host,
    layout: RuntimeLayout,
    app_name: String,
    engine: ScriptEngine,
    telemetry: TelemetryHandle,
}

impl EmbeddedRuntime {
    /// Collaborators bound for this runtime.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Resolved runtime layout.
    #[must_use]
    pub const fn layout(&self) -> &RuntimeLayout {
        &self.layout
    }

    /// Logical name of the hosted application.
    #[must_use]
    pub fn app_name(&self) -> &str {
        self.app_name.as_str()
    }

    /// Activated script engine.
    #[must_use]
    pub const fn engine(&self) -> &ScriptEngine {
        &self.engine
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }
}

/// Bootstraps the embedded runtime using the supplied collaborators.
///
/// # Errors
///
/// Returns the first failure annotated with the stage that raised it. A
/// failure reported by the call-dispatch subsystem is kept verbatim and module
/// activation is not attempted.
pub fn bootstrap_with(
    request: &InitRequest,
    binder: &dyn HostBinder,
    environment: &dyn EnvironmentSource,
    platform: &PlatformInit,
    reporter: &dyn HealthReporter,
) -> Result<EmbeddedRuntime, BootstrapError> {
    bootstrap_observed(request, binder, environment, platform, reporter, |_| {})
}

/// Like [`bootstrap_with`], calling `on_handoff` once the call-dispatch
/// subsystem accepts the configuration.
pub(crate) fn bootstrap_observed(
    request: &InitRequest,
    binder: &dyn HostBinder,
    environment: &dyn EnvironmentSource,
    platform: &PlatformInit,
    reporter: &dyn HealthReporter,
    on_handoff: impl FnOnce(&Arc<dyn CallDispatcher>),
) -> Result<EmbeddedRuntime, BootstrapError> {
    reporter.init_starting();
    let result = run(request, binder, environment, platform, reporter, on_handoff);
    match &result {
        Ok(runtime) => reporter.init_succeeded(runtime.app_name(), runtime.engine()),
        Err(error) => reporter.init_failed(error),
    }
    result
}

fn at<E: Into<EmbedError>>(stage: Stage) -> impl FnOnce(E) -> BootstrapError {
    move |error| BootstrapError::new(stage, error)
}

fn run(
    request: &InitRequest,
    binder: &dyn HostBinder,
    environment: &dyn EnvironmentSource,
    platform: &PlatformInit,
    reporter: &dyn HealthReporter,
    on_handoff: impl FnOnce(&Arc<dyn CallDispatcher>),
) -> Result<EmbeddedRuntime, BootstrapError> {
    paths::validate(request.runtime_home(), request.app_dir())
        .map_err(at(Stage::ValidatePaths))?;
    let layout = RuntimeLayout::resolve(request.runtime_home())
        .map_err(ConfigurationError::from)
        .map_err(at(Stage::ValidatePaths))?;
    let app_layout = ApplicationLayout::resolve(request.app_dir())
        .map_err(ConfigurationError::from)
        .map_err(at(Stage::ValidatePaths))?;

    let host = binder.bind(&layout).map_err(at(Stage::BindHost))?;

    let identity = identity::resolve(&app_layout).map_err(at(Stage::ResolveIdentity))?;
    let telemetry = telemetry::initialise(identity.logging())
        .map_err(ConfigurationError::from)
        .map_err(at(Stage::Telemetry))?;

    let packages =
        load_bundled_packages(&layout, host.registry()).map_err(at(Stage::BundledPackages))?;
    let paths = scan_vendor_directory(&layout, identity.name(), app_layout.dir())
        .map_err(at(Stage::VendorScan))?;
    let snapshot = EnvironmentSnapshot::capture(environment).map_err(at(Stage::Environment))?;

    let engine = request.script_engine();
    let config = document::assemble(&layout, engine, packages, snapshot, paths, WILTON_VERSION)
        .to_json()
        .map_err(at(Stage::AssembleConfig))?;
    debug!(bytes = config.len(), "assembled runtime configuration");

    host.dispatcher()
        .initialize(&config)
        .map_err(at(Stage::DelegateInit))?;
    on_handoff(host.dispatcher());

    ModuleActivator::new(host.registry(), host.signals(), platform, reporter)
        .activate(&ActivationPlan::for_engine(engine), layout.bin_dir())
        .map_err(at(Stage::ActivateModules))?;

    Ok(EmbeddedRuntime {
        app_name: identity.name().to_owned(),
        engine: engine.clone(),
        host,
        layout,
        telemetry,
    })
}
