//! C ABI surface — the `scb_*` functions foreign callers link against.
//!
//! Mirrors the bridge contract consumed by runtimes without OS API
//! bindings: NUL-terminated byte strings in, integer flags out. Every
//! export is stateless and operates on the platform default clipboard;
//! failures surface only as the documented default values, never as
//! unwinding (nothing here panics on the operational path).
//!
//! Buffers returned by [`scb_get_text`] are owned by the caller and
//! must be released through [`scb_free_text`] — they come from this
//! crate's allocator, so a foreign `free()` is not a valid release.

use std::ffi::{CStr, CString, c_char, c_int};

use crate::accessor::ClipboardAccessor;

/// Current clipboard text as a NUL-terminated buffer, or NULL if no
/// text is available. Bytes are returned exactly as stored, with no
/// encoding conversion. The caller owns the buffer and releases it
/// with [`scb_free_text`].
#[unsafe(no_mangle)]
pub extern "C" fn scb_get_text() -> *mut c_char {
    let Some(bytes) = ClipboardAccessor::system().read_bytes() else {
        return std::ptr::null_mut();
    };
    match CString::new(bytes) {
        Ok(buf) => buf.into_raw(),
        // Interior NUL cannot cross a C string boundary; treat the
        // payload as unavailable rather than truncating it silently.
        Err(_) => std::ptr::null_mut(),
    }
}

/// Set the clipboard to the NUL-terminated string `text`. The bytes
/// pass through unmodified, so non-UTF-8 single-byte text is
/// preserved. Returns 1 on success, 0 on failure. NULL is rejected
/// before any clipboard access.
///
/// # Safety
///
/// `text`, when non-NULL, must point to a valid NUL-terminated string
/// that outlives the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn scb_set_text(text: *const c_char) -> c_int {
    if text.is_null() {
        return 0;
    }
    let bytes = unsafe { CStr::from_ptr(text) }.to_bytes();
    c_int::from(ClipboardAccessor::system().write_bytes(bytes))
}

/// Clear the clipboard. Returns 1 on success, 0 on failure.
#[unsafe(no_mangle)]
pub extern "C" fn scb_clear() -> c_int {
    c_int::from(ClipboardAccessor::system().clear())
}

/// Whether plain-text content is available. Returns 1 or 0.
#[unsafe(no_mangle)]
pub extern "C" fn scb_has_text() -> c_int {
    c_int::from(ClipboardAccessor::system().has_text())
}

/// Whether the clipboard holds no formats. Returns 1 or 0; reports 1
/// when the clipboard cannot be acquired.
#[unsafe(no_mangle)]
pub extern "C" fn scb_is_empty() -> c_int {
    c_int::from(ClipboardAccessor::system().is_empty())
}

/// Number of formats currently registered; 0 when the clipboard cannot
/// be acquired.
#[unsafe(no_mangle)]
pub extern "C" fn scb_format_count() -> c_int {
    ClipboardAccessor::system()
        .format_count()
        .try_into()
        .unwrap_or(c_int::MAX)
}

/// Release a buffer returned by [`scb_get_text`]. NULL is a no-op.
///
/// # Safety
///
/// `text` must be NULL or a pointer previously returned by
/// [`scb_get_text`] that has not already been released.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn scb_free_text(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(text) });
}
