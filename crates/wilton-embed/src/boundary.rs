//! Conversion of results into the C ABI conventions.
//!
//! Errors cross the boundary as NUL-terminated strings allocated with the
//! same allocator as [`alloc`], so a host can always release them through
//! `wilton_embed_free`.

use std::any::Any;
use std::ffi::c_char;
use std::ptr;

use crate::error::{BootstrapError, EmbedError};

/// Renders a bootstrap failure as the message returned by `init`.
///
/// Parameter failures are returned as plain messages and delegate failures
/// verbatim. Everything else carries the failing stage and an exception
/// marker.
#[must_use]
pub fn render(error: &BootstrapError) -> String {
    match error.error() {
        EmbedError::Parameter(parameter) => parameter.to_string(),
        EmbedError::Delegate(delegate) => delegate.0.clone(),
        other => traced(&other.to_string(), error.stage().as_str()),
    }
}

/// Renders a caught panic raised while running `operation`.
#[must_use]
pub fn render_panic(payload: &(dyn Any + Send), operation: &str) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned());
    traced(&message, operation)
}

fn traced(message: &str, location: &str) -> String {
    format!("{message}\n    at {location}\nException raised")
}

/// Allocates `size` bytes with the boundary allocator.
///
/// Returns null when `size` is zero or the allocation fails.
#[must_use]
pub fn alloc(size: usize) -> *mut c_char {
    if size == 0 {
        return ptr::null_mut();
    }
    // SAFETY: `malloc` accepts any non-zero size and may return null.
    unsafe { libc::malloc(size) }.cast()
}

/// Copies `bytes` into a fresh NUL-terminated boundary buffer.
///
/// Returns null when the allocation fails.
#[must_use]
pub fn alloc_copy(bytes: &[u8]) -> *mut c_char {
    let Some(size) = bytes.len().checked_add(1) else {
        return ptr::null_mut();
    };
    let buffer = alloc(size);
    if buffer.is_null() {
        return buffer;
    }
    // SAFETY: `buffer` holds `bytes.len() + 1` writable bytes that do not
    // overlap `bytes`.
    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr(), buffer.cast::<u8>(), bytes.len());
        buffer.cast::<u8>().add(bytes.len()).write(0);
    }
    buffer
}

/// Releases a buffer obtained from [`alloc`] or [`alloc_copy`].
///
/// # Safety
///
/// `buffer` must be null or come from this module's allocator, and must not be
/// used afterwards.
pub unsafe fn release(buffer: *mut c_char) {
    if buffer.is_null() {
        return;
    }
    // SAFETY: guaranteed by the caller.
    unsafe { libc::free(buffer.cast()) };
}
