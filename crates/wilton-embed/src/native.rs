//! Production collaborators backed by the runtime's shared libraries.
//!
//! `wilton_core` provides the call-dispatch subsystem and the module loader,
//! `wilton_signal` the signal handlers. Both are opened from the runtime's
//! `bin/` directory. Buffers returned by the core are copied into Rust memory
//! and released with the core's own `wilton_free`.

use std::ffi::{CStr, c_char, c_int};
use std::path::PathBuf;
use std::ptr;
use std::slice;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use libloading::{Library, library_filename};
use once_cell::sync::OnceCell;
use tracing::debug;
use wilton_embed_config::{RuntimeLayout, native_module_name};

use crate::activation::ModuleRegistry;
use crate::error::{DelegateError, HostError, ModuleLoadError};
use crate::host::{CallDispatcher, Host, HostBinder};
use crate::platform::SignalSubsystem;

type InitFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut c_char;
type CallFn = unsafe extern "C" fn(
    *const c_char,
    c_int,
    *const c_char,
    c_int,
    *mut *mut c_char,
    *mut c_int,
) -> *mut c_char;
type DyloadFn = unsafe extern "C" fn(*const c_char, c_int, *const c_char, c_int) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);
type SignalInitFn = unsafe extern "C" fn() -> *mut c_char;

fn library_path(bin_dir: &Utf8Path, module: &str) -> PathBuf {
    bin_dir.as_std_path().join(library_filename(module))
}

fn open_library(bin_dir: &Utf8Path, module: &str) -> Result<Library, libloading::Error> {
    let path = library_path(bin_dir, module);
    debug!(path = %path.display(), "opening native library");
    // SAFETY: the runtime's libraries have no initialisation routines with
    // preconditions beyond being loaded once per path.
    unsafe { Library::new(path) }
}

fn resolve<T: Copy>(library: &Library, symbol: &str) -> Result<T, HostError> {
    let mut name = symbol.as_bytes().to_vec();
    name.push(0);
    // SAFETY: `T` matches the C prototype exported under `symbol`.
    let resolved = unsafe { library.get::<T>(&name) }.map_err(|source| {
        HostError::with_source(format!("missing native symbol '{symbol}'"), source)
    })?;
    Ok(*resolved)
}

fn length(bytes: &[u8]) -> Result<c_int, String> {
    c_int::try_from(bytes.len()).map_err(|_| format!("buffer too large: [{}] bytes", bytes.len()))
}

/// Copies a NUL-terminated message owned by the core and frees it.
///
/// # Safety
///
/// `message` must be a non-null, NUL-terminated buffer allocated by the core.
unsafe fn take_message(free: FreeFn, message: *mut c_char) -> String {
    // SAFETY: guaranteed by the caller.
    let text = unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned();
    // SAFETY: the buffer came from the core's allocator.
    unsafe { free(message) };
    text
}

/// Entry points of `wilton_core`.
pub struct NativeCore {
    init: InitFn,
    call: CallFn,
    dyload: DyloadFn,
    free: FreeFn,
    _library: Library,
}

impl NativeCore {
    /// Opens `wilton_core` from `bin_dir` and resolves its entry points.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the library or a symbol is missing.
    pub fn open(bin_dir: &Utf8Path) -> Result<Self, HostError> {
        let module = native_module_name("core");
        let library = open_library(bin_dir, &module).map_err(|source| {
            HostError::with_source(format!("unable to open native module '{module}'"), source)
        })?;
        Ok(Self {
            init: resolve(&library, "wiltoncall_init")?,
            call: resolve(&library, "wiltoncall")?,
            dyload: resolve(&library, "wilton_dyload")?,
            free: resolve(&library, "wilton_free")?,
            _library: library,
        })
    }

    fn failure(&self, message: *mut c_char) -> Option<String> {
        if message.is_null() {
            return None;
        }
        // SAFETY: non-null error buffers returned by the core are
        // NUL-terminated and owned by its allocator.
        Some(unsafe { take_message(self.free, message) })
    }
}

impl CallDispatcher for NativeCore {
    fn initialize(&self, config_json: &str) -> Result<(), DelegateError> {
        let len = length(config_json.as_bytes()).map_err(DelegateError)?;
        // SAFETY: the pointer and length describe `config_json`.
        let error = unsafe { (self.init)(config_json.as_ptr().cast(), len) };
        self.failure(error).map_or(Ok(()), |message| Err(DelegateError(message)))
    }

    fn call(&self, name: &[u8], payload: &[u8]) -> Result<Vec<u8>, String> {
        let name_len = length(name)?;
        let payload_len = length(payload)?;
        let mut out: *mut c_char = ptr::null_mut();
        let mut out_len: c_int = 0;
        // SAFETY: the input pointers and lengths describe live slices and the
        // output pointers refer to locals.
        let error = unsafe {
            (self.call)(
                name.as_ptr().cast(),
                name_len,
                payload.as_ptr().cast(),
                payload_len,
                &raw mut out,
                &raw mut out_len,
            )
        };
        if let Some(message) = self.failure(error) {
            return Err(message);
        }
        if out.is_null() {
            return Ok(Vec::new());
        }
        let count = usize::try_from(out_len).unwrap_or(0);
        // SAFETY: the core returned `out_len` readable bytes at `out`.
        let result = unsafe { slice::from_raw_parts(out.cast::<u8>(), count) }.to_vec();
        // SAFETY: `out` was allocated by the core.
        unsafe { (self.free)(out) };
        Ok(result)
    }
}

impl ModuleRegistry for NativeCore {
    fn load(&self, name: &str, search_root: &Utf8Path) -> Result<(), ModuleLoadError> {
        let directory = format!("{search_root}/");
        let lengths = length(name.as_bytes()).and_then(|name_len| {
            length(directory.as_bytes()).map(|dir_len| (name_len, dir_len))
        });
        let (name_len, dir_len) = lengths.map_err(|message| ModuleLoadError::new(name, message))?;
        // SAFETY: both pointers and lengths describe live strings.
        let error = unsafe {
            (self.dyload)(
                name.as_ptr().cast(),
                name_len,
                directory.as_ptr().cast(),
                dir_len,
            )
        };
        self.failure(error)
            .map_or(Ok(()), |message| Err(ModuleLoadError::new(name, message)))
    }
}

/// Signal subsystem exported by `wilton_signal`.
pub struct NativeSignals {
    bin_dir: Utf8PathBuf,
    free: FreeFn,
    library: OnceCell<Library>,
}

impl NativeSignals {
    fn new(bin_dir: &Utf8Path, free: FreeFn) -> Self {
        Self {
            bin_dir: bin_dir.to_path_buf(),
            free,
            library: OnceCell::new(),
        }
    }
}

impl SignalSubsystem for NativeSignals {
    fn initialize(&self) -> Result<(), String> {
        let module = native_module_name("signal");
        let library = self
            .library
            .get_or_try_init(|| open_library(&self.bin_dir, &module))
            .map_err(|error| format!("unable to open native module '{module}': {error}"))?;
        let initialise: SignalInitFn =
            resolve(library, "wilton_signal_initialize").map_err(|error| error.to_string())?;
        // SAFETY: `wilton_signal_initialize` takes no arguments.
        let error = unsafe { initialise() };
        if error.is_null() {
            return Ok(());
        }
        // SAFETY: error buffers are NUL-terminated and owned by the core.
        Err(unsafe { take_message(self.free, error) })
    }
}

/// Binds the collaborators from the shared libraries under `bin/`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHostBinder;

impl HostBinder for NativeHostBinder {
    fn bind(&self, layout: &RuntimeLayout) -> Result<Host, HostError> {
        let core = Arc::new(NativeCore::open(layout.bin_dir())?);
        let signals = Arc::new(NativeSignals::new(layout.bin_dir(), core.free));
        Ok(Host::new(core.clone(), core, signals))
    }
}
