//! Resolution of the hosted application's logical name.

use wilton_embed_config::{AppConfig, ApplicationLayout, LoggingSettings};

use crate::error::ConfigurationError;

/// Name of the hosted application plus the embed settings read alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationIdentity {
    name: String,
    logging: LoggingSettings,
}

impl ApplicationIdentity {
    /// Logical module name of the application.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Telemetry settings from the descriptor, or defaults.
    #[must_use]
    pub const fn logging(&self) -> &LoggingSettings {
        &self.logging
    }
}

/// Reads `conf/config.json` at most once and derives the application name.
///
/// A present descriptor must carry a non-empty `appname`. Without one, the
/// final segment of the directory path as supplied is used.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when the descriptor is unreadable, lacks a
/// name, or the directory path has no final segment.
pub fn resolve(layout: &ApplicationLayout) -> Result<ApplicationIdentity, ConfigurationError> {
    if let Some(config) = AppConfig::load(layout.config_file())? {
        return Ok(ApplicationIdentity {
            name: config.application_name()?.to_owned(),
            logging: config.logging().clone(),
        });
    }
    let name = layout
        .directory_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ConfigurationError::UnnamedAppDir {
            path: layout.requested().to_path_buf(),
        })?;
    Ok(ApplicationIdentity {
        name: name.to_owned(),
        logging: LoggingSettings::default(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;
    use wilton_embed_config::LogFormat;

    use super::*;

    struct AppRoot {
        _temp: TempDir,
        dir: Utf8PathBuf,
    }

    impl AppRoot {
        fn layout(&self) -> ApplicationLayout {
            ApplicationLayout::resolve(&self.dir).expect("resolve app layout")
        }

        fn write_config(&self, contents: &str) {
            let conf = self.dir.join("conf");
            fs::create_dir_all(&conf).expect("create conf dir");
            fs::write(conf.join("config.json"), contents).expect("write config");
        }
    }

    #[fixture]
    fn app_root() -> AppRoot {
        let temp = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("UTF-8 temp dir");
        let dir = root.join("myapp");
        fs::create_dir(&dir).expect("create app dir");
        AppRoot { _temp: temp, dir }
    }

    #[rstest]
    fn descriptor_name_wins(app_root: AppRoot) {
        app_root.write_config(r#"{"appname":"foo"}"#);
        let identity = resolve(&app_root.layout()).expect("name should resolve");
        assert_eq!(identity.name(), "foo");
    }

    #[rstest]
    fn falls_back_to_directory_name(app_root: AppRoot) {
        let identity = resolve(&app_root.layout()).expect("name should resolve");
        assert_eq!(identity.name(), "myapp");
        assert_eq!(identity.logging(), &LoggingSettings::default());
    }

    #[rstest]
    fn trailing_parent_segment_uses_canonical_name(app_root: AppRoot) {
        fs::create_dir(app_root.dir.join("sub")).expect("create subdir");
        let layout = ApplicationLayout::resolve(&app_root.dir.join("sub").join(".."))
            .expect("resolve app layout");
        let identity = resolve(&layout).expect("name should resolve");
        assert_eq!(identity.name(), "myapp");
    }

    #[rstest]
    fn empty_appname_is_a_configuration_error(app_root: AppRoot) {
        app_root.write_config(r#"{"appname":""}"#);
        let error = resolve(&app_root.layout()).expect_err("empty name must fail");
        assert!(matches!(error, ConfigurationError::AppConfig(_)));
    }

    #[rstest]
    fn embed_settings_travel_with_the_name(app_root: AppRoot) {
        app_root.write_config(r#"{"appname":"svc","embed":{"logFormat":"json"}}"#);
        let identity = resolve(&app_root.layout()).expect("name should resolve");
        assert_eq!(identity.logging().log_format(), LogFormat::Json);
    }
}
