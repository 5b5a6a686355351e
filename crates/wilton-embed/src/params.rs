//! Validation of the explicit-length arguments accepted by `init`.

use std::ffi::{c_char, c_int};
use std::fmt;
use std::slice;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ParameterError;

/// Checks that `length` is a positive count that fits in 16 bits.
///
/// # Errors
///
/// Returns [`ParameterError::InvalidLength`] otherwise.
pub fn validate_length(name: &'static str, length: i64) -> Result<usize, ParameterError> {
    match u16::try_from(length) {
        Ok(count) if count > 0 => Ok(usize::from(count)),
        _ => Err(ParameterError::InvalidLength { name, length }),
    }
}

/// Borrows a caller-owned buffer after checking its pointer and length.
///
/// # Errors
///
/// Returns [`ParameterError::Null`] for a null pointer and
/// [`ParameterError::InvalidLength`] for a length outside `1..=u16::MAX`.
///
/// # Safety
///
/// When non-null, `ptr` must be valid for reads of `length` bytes for the
/// lifetime `'a`.
pub unsafe fn raw_argument<'a>(
    name: &'static str,
    ptr: *const c_char,
    length: c_int,
) -> Result<&'a [u8], ParameterError> {
    if ptr.is_null() {
        return Err(ParameterError::Null { name });
    }
    let count = validate_length(name, i64::from(length))?;
    // SAFETY: the caller guarantees `ptr` is readable for `length` bytes and
    // `count` equals that positive length.
    Ok(unsafe { slice::from_raw_parts(ptr.cast::<u8>(), count) })
}

/// Borrows a caller-owned payload buffer that may be empty.
///
/// # Errors
///
/// Returns [`ParameterError::Null`] for a null pointer and
/// [`ParameterError::InvalidLength`] for a negative length.
///
/// # Safety
///
/// When non-null, `ptr` must be valid for reads of `length` bytes for the
/// lifetime `'a`.
pub unsafe fn payload_argument<'a>(
    name: &'static str,
    ptr: *const c_char,
    length: c_int,
) -> Result<&'a [u8], ParameterError> {
    if ptr.is_null() {
        return Err(ParameterError::Null { name });
    }
    let count = usize::try_from(length).map_err(|_| ParameterError::InvalidLength {
        name,
        length: i64::from(length),
    })?;
    // SAFETY: the caller guarantees `ptr` is readable for `length` bytes.
    Ok(unsafe { slice::from_raw_parts(ptr.cast::<u8>(), count) })
}

fn utf8_argument<'a>(name: &'static str, bytes: &'a [u8]) -> Result<&'a str, ParameterError> {
    validate_length(name, i64::try_from(bytes.len()).unwrap_or(i64::MAX))?;
    std::str::from_utf8(bytes).map_err(|_| ParameterError::NotUtf8 { name })
}

/// Identifier of the script engine to activate, e.g. `quickjs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptEngine(String);

impl ScriptEngine {
    /// Validates an engine identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidScriptEngine`] when the value is empty
    /// or contains a path separator or NUL, since it forms a module name.
    pub fn new(value: impl Into<String>) -> Result<Self, ParameterError> {
        let value = value.into();
        let invalid = value.is_empty() || value.contains(['/', '\\', '\0']);
        if invalid {
            return Err(ParameterError::InvalidScriptEngine { value });
        }
        Ok(Self(value))
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ScriptEngine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated arguments of a single `init` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitRequest {
    runtime_home: Utf8PathBuf,
    script_engine: ScriptEngine,
    app_dir: Utf8PathBuf,
}

impl InitRequest {
    /// Builds a request from already decoded strings.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] when an argument is empty, longer than
    /// `u16::MAX` bytes, or the engine identifier is invalid.
    pub fn new(
        runtime_home: &str,
        script_engine: &str,
        app_dir: &str,
    ) -> Result<Self, ParameterError> {
        Self::from_bytes(
            runtime_home.as_bytes(),
            script_engine.as_bytes(),
            app_dir.as_bytes(),
        )
    }

    /// Builds a request from the raw argument bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] when an argument has an invalid length, is
    /// not UTF-8, or the engine identifier is invalid.
    pub fn from_bytes(
        runtime_home: &[u8],
        script_engine: &[u8],
        app_dir: &[u8],
    ) -> Result<Self, ParameterError> {
        let runtime_home = utf8_argument("wilton_home", runtime_home)?;
        let script_engine = utf8_argument("script_engine", script_engine)?;
        let app_dir = utf8_argument("app_dir", app_dir)?;
        Ok(Self {
            runtime_home: Utf8PathBuf::from(runtime_home),
            script_engine: ScriptEngine::new(script_engine)?,
            app_dir: Utf8PathBuf::from(app_dir),
        })
    }

    /// Runtime installation root as supplied.
    #[must_use]
    pub fn runtime_home(&self) -> &Utf8Path {
        &self.runtime_home
    }

    /// Requested script engine.
    #[must_use]
    pub const fn script_engine(&self) -> &ScriptEngine {
        &self.script_engine
    }

    /// Application directory as supplied.
    #[must_use]
    pub fn app_dir(&self) -> &Utf8Path {
        &self.app_dir
    }
}
