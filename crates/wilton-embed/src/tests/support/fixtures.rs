//! On-disk runtime home and application directory for bootstrap tests.

use std::fs::{self, File};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use tempfile::TempDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::params::InitRequest;

/// Manifest written into the default standard library archive.
pub const DEFAULT_MANIFEST: &str = r#"[{"name":"lodash","main":"lodash"},{"name":"moment"}]"#;

/// Writes a stored (uncompressed) zip archive with the given entries.
pub fn write_archive(path: &Utf8Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("create archive");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, contents) in entries {
        writer.start_file(*name, options).expect("start archive entry");
        writer
            .write_all(contents.as_bytes())
            .expect("write archive entry");
    }
    writer.finish().expect("finish archive");
}

/// Temporary runtime home with `bin/`, `std.wlib`, and an application dir.
pub struct RuntimeFixture {
    _temp: TempDir,
    pub home: Utf8PathBuf,
    pub app: Utf8PathBuf,
}

impl RuntimeFixture {
    /// Builds a runtime home whose archive carries `manifest`.
    #[must_use]
    pub fn with_manifest(manifest: &str) -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("UTF-8 temp dir");
        let home = root.join("wilton");
        let app = root.join("myapp");
        fs::create_dir_all(home.join("bin")).expect("create bin dir");
        fs::create_dir_all(&app).expect("create app dir");
        write_archive(
            &home.join("std.wlib"),
            &[("wilton-requirejs/wilton-packages.json", manifest)],
        );
        Self {
            _temp: temp,
            home,
            app,
        }
    }

    /// Canonical runtime home.
    #[must_use]
    pub fn canonical_home(&self) -> Utf8PathBuf {
        let canonical = fs::canonicalize(&self.home).expect("canonicalise home");
        Utf8PathBuf::from_path_buf(canonical).expect("UTF-8 home")
    }

    /// Canonical application directory.
    #[must_use]
    pub fn canonical_app(&self) -> Utf8PathBuf {
        let canonical = fs::canonicalize(&self.app).expect("canonicalise app");
        Utf8PathBuf::from_path_buf(canonical).expect("UTF-8 app")
    }

    /// Populates `lib/` with a directory, a script, and a packaged library.
    pub fn add_vendor_libraries(&self) {
        let lib = self.home.join("lib");
        fs::create_dir_all(lib.join("moda")).expect("create moda");
        fs::write(lib.join("modb.js"), "define([], function () {});").expect("write modb.js");
        write_archive(&lib.join("modc.wlib"), &[("modc/index.js", "")]);
        fs::write(lib.join("README.txt"), "ignored").expect("write README");
    }

    /// Writes `conf/config.json` in the application directory.
    pub fn write_app_config(&self, contents: &str) {
        let conf = self.app.join("conf");
        fs::create_dir_all(&conf).expect("create conf dir");
        fs::write(conf.join("config.json"), contents).expect("write app config");
    }

    /// Replaces the archive with one lacking the manifest entry.
    pub fn drop_manifest(&self) {
        write_archive(&self.home.join("std.wlib"), &[("other.txt", "x")]);
    }

    /// Request for this runtime home and application.
    #[must_use]
    pub fn request(&self, engine: &str) -> InitRequest {
        InitRequest::new(self.home.as_str(), engine, self.app.as_str())
            .expect("fixture request is valid")
    }

    /// Request whose runtime home does not exist.
    #[must_use]
    pub fn request_with_missing_home(&self, engine: &str) -> InitRequest {
        let missing = self.home.join("missing");
        InitRequest::new(missing.as_str(), engine, self.app.as_str())
            .expect("fixture request is valid")
    }

    /// Request whose application directory is a regular file.
    #[must_use]
    pub fn request_with_file_app(&self, engine: &str) -> InitRequest {
        let file = self.home.join("std.wlib");
        InitRequest::new(self.home.as_str(), engine, file.as_str())
            .expect("fixture request is valid")
    }
}

#[fixture]
pub fn runtime() -> RuntimeFixture {
    RuntimeFixture::with_manifest(DEFAULT_MANIFEST)
}
