//! Exported C ABI of the embed layer.
//!
//! Every function catches panics; nothing unwinds into the host. Returned
//! error strings and `json_out` buffers are allocated by
//! [`wilton_embed_alloc`] and must be released with [`wilton_embed_free`].

use std::ffi::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use once_cell::sync::Lazy;

use crate::boundary;
use crate::error::{BootstrapError, ParameterError, Stage};
use crate::lifecycle::Embedder;
use crate::params::{payload_argument, raw_argument};

static EMBEDDER: Lazy<Embedder> = Lazy::new(Embedder::native);

fn guarded(operation: &str, body: impl FnOnce() -> *mut c_char) -> *mut c_char {
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        boundary::alloc_copy(boundary::render_panic(payload.as_ref(), operation).as_bytes())
    })
}

fn parameter_failure(error: ParameterError) -> *mut c_char {
    let error = BootstrapError::new(Stage::Parameters, error);
    boundary::alloc_copy(boundary::render(&error).as_bytes())
}

/// Allocates a buffer the host may pass back to [`wilton_embed_free`].
#[unsafe(no_mangle)]
pub extern "C" fn wilton_embed_alloc(size_bytes: c_int) -> *mut c_char {
    usize::try_from(size_bytes).map_or(ptr::null_mut(), boundary::alloc)
}

/// Releases a buffer returned by this library.
///
/// # Safety
///
/// `buffer` must be null or a buffer returned by this library that has not
/// been released yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn wilton_embed_free(buffer: *mut c_char) {
    // SAFETY: guaranteed by the caller.
    unsafe { boundary::release(buffer) };
}

/// Bootstraps the runtime. Returns null on success or an error message.
///
/// # Safety
///
/// Each non-null pointer must be readable for its accompanying length.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn wilton_embed_init(
    wilton_home: *const c_char,
    wilton_home_len: c_int,
    script_engine: *const c_char,
    script_engine_len: c_int,
    app_dir: *const c_char,
    app_dir_len: c_int,
) -> *mut c_char {
    guarded("wilton_embed_init", || {
        // SAFETY: the caller guarantees every pointer covers its length.
        let arguments = unsafe {
            raw_argument("wilton_home", wilton_home, wilton_home_len).and_then(|home| {
                let engine = raw_argument("script_engine", script_engine, script_engine_len)?;
                let app = raw_argument("app_dir", app_dir, app_dir_len)?;
                Ok((home, engine, app))
            })
        };
        let (home, engine, app) = match arguments {
            Ok(arguments) => arguments,
            Err(error) => return parameter_failure(error),
        };
        match EMBEDDER.init_from_bytes(home, engine, app) {
            Ok(()) => ptr::null_mut(),
            Err(error) => boundary::alloc_copy(boundary::render(&error).as_bytes()),
        }
    })
}

/// Requests shutdown. Always returns null.
#[unsafe(no_mangle)]
pub extern "C" fn wilton_embed_shutdown() -> *mut c_char {
    guarded("wilton_embed_shutdown", || {
        EMBEDDER.shutdown();
        ptr::null_mut()
    })
}

/// Passes a call through to the call-dispatch subsystem.
///
/// On success `json_out` receives a NUL-terminated result buffer and
/// `json_out_len` its length without the terminator.
///
/// # Safety
///
/// `call_name` and `json_in` must be readable for their lengths; `json_out`
/// and `json_out_len` must be writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn wilton_embed_call(
    call_name: *const c_char,
    call_name_len: c_int,
    json_in: *const c_char,
    json_in_len: c_int,
    json_out: *mut *mut c_char,
    json_out_len: *mut c_int,
) -> *mut c_char {
    guarded("wilton_embed_call", || {
        if json_out.is_null() {
            return parameter_failure(ParameterError::Null { name: "json_out" });
        }
        if json_out_len.is_null() {
            return parameter_failure(ParameterError::Null { name: "json_out_len" });
        }
        // SAFETY: the caller guarantees both pointers cover their lengths.
        let arguments = unsafe {
            raw_argument("call_name", call_name, call_name_len).and_then(|name| {
                let payload = payload_argument("json_in", json_in, json_in_len)?;
                Ok((name, payload))
            })
        };
        let (name, payload) = match arguments {
            Ok(arguments) => arguments,
            Err(error) => return parameter_failure(error),
        };
        let result = match EMBEDDER.call(name, payload) {
            Ok(result) => result,
            Err(error) => return boundary::alloc_copy(error.to_string().as_bytes()),
        };
        let Ok(length) = c_int::try_from(result.len()) else {
            let message = format!("call result too large: [{}] bytes", result.len());
            return boundary::alloc_copy(message.as_bytes());
        };
        let buffer = boundary::alloc_copy(&result);
        if buffer.is_null() {
            return boundary::alloc_copy(b"unable to allocate call result buffer");
        }
        // SAFETY: both output pointers were checked for null and the caller
        // guarantees they are writable.
        unsafe {
            json_out.write(buffer);
            json_out_len.write(length);
        }
        ptr::null_mut()
    })
}
