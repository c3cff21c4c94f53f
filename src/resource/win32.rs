//! Win32 clipboard backend.
//!
//! Wraps the `OpenClipboard`/`CloseClipboard` bracket and the
//! `GMEM_MOVEABLE` memory handoff behind [`ClipboardResource`]. Content
//! is read and written through `CF_TEXT` (single-byte text, NUL
//! terminated); no wide-text format is touched.
//!
//! Ownership of written memory follows the Win32 contract: a
//! successfully registered `HGLOBAL` belongs to the OS and must not be
//! freed here, while every failure path frees exactly once. The
//! [`GlobalBuf`] guard encodes that rule so no branch can leak or
//! double-free.

use std::ffi::CStr;
use std::os::raw::c_char;

use windows_sys::Win32::Foundation::HANDLE;
use windows_sys::Win32::System::DataExchange::{
    CloseClipboard, CountClipboardFormats, EmptyClipboard, GetClipboardData,
    IsClipboardFormatAvailable, OpenClipboard, SetClipboardData,
};
use windows_sys::Win32::System::Memory::{
    GMEM_MOVEABLE, GlobalAlloc, GlobalFree, GlobalLock, GlobalUnlock,
};
use windows_sys::Win32::System::Ole::CF_TEXT;

use super::{ClipboardResource, ClipboardSession, ResourceError};

/// Win32 implementation of [`ClipboardResource`].
pub struct Win32Clipboard;

impl Win32Clipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Win32Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardResource for Win32Clipboard {
    fn open(&self) -> Result<Box<dyn ClipboardSession + '_>, ResourceError> {
        // NULL owner window: the clipboard is associated with the
        // current task, matching console / windowless callers.
        let opened = unsafe { OpenClipboard(std::ptr::null_mut()) };
        if opened == 0 {
            return Err(ResourceError::Busy("OpenClipboard failed".into()));
        }
        Ok(Box::new(Win32Session))
    }

    fn text_available(&self) -> bool {
        unsafe { IsClipboardFormatAvailable(CF_TEXT as u32) != 0 }
    }
}

/// Open clipboard bracket. Construction is private to [`Win32Clipboard::open`];
/// `Drop` closes the clipboard, so the bracket cannot leak.
struct Win32Session;

impl Drop for Win32Session {
    fn drop(&mut self) {
        unsafe {
            CloseClipboard();
        }
    }
}

impl ClipboardSession for Win32Session {
    fn read(&mut self) -> Result<Option<Vec<u8>>, ResourceError> {
        unsafe {
            let handle = GetClipboardData(CF_TEXT as u32);
            if handle.is_null() {
                // No CF_TEXT content registered. A valid terminal
                // state, not a failure.
                return Ok(None);
            }
            let ptr = GlobalLock(handle);
            if ptr.is_null() {
                return Err(ResourceError::Backend("GlobalLock failed".into()));
            }
            // The OS-held block is NUL terminated; copy out up to the
            // terminator so the caller owns the bytes outright.
            let bytes = CStr::from_ptr(ptr as *const c_char).to_bytes().to_vec();
            GlobalUnlock(handle);
            Ok(Some(bytes))
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ResourceError> {
        let buf = GlobalBuf::copied_from(bytes)?;
        unsafe {
            EmptyClipboard();
            let registered = SetClipboardData(CF_TEXT as u32, buf.0 as HANDLE);
            if registered.is_null() {
                // `buf` drops here and frees the block.
                return Err(ResourceError::Backend("SetClipboardData failed".into()));
            }
        }
        // Registration succeeded: the OS owns the block now.
        buf.into_raw();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ResourceError> {
        let emptied = unsafe { EmptyClipboard() };
        if emptied == 0 {
            return Err(ResourceError::Backend("EmptyClipboard failed".into()));
        }
        Ok(())
    }

    fn format_count(&mut self) -> usize {
        let count = unsafe { CountClipboardFormats() };
        count.max(0) as usize
    }
}

/// Owned `GMEM_MOVEABLE` block, freed on drop unless ownership is
/// transferred to the OS via [`GlobalBuf::into_raw`].
struct GlobalBuf(*mut core::ffi::c_void);

impl GlobalBuf {
    /// Allocate a moveable block of `bytes.len() + 1` and copy `bytes`
    /// in, NUL terminated. The block is locked only for the copy.
    fn copied_from(bytes: &[u8]) -> Result<Self, ResourceError> {
        unsafe {
            let handle = GlobalAlloc(GMEM_MOVEABLE, bytes.len() + 1);
            if handle.is_null() {
                return Err(ResourceError::Alloc("GlobalAlloc failed".into()));
            }
            let buf = GlobalBuf(handle);
            let ptr = GlobalLock(handle) as *mut u8;
            if ptr.is_null() {
                // `buf` drops and frees.
                return Err(ResourceError::Alloc("GlobalLock failed".into()));
            }
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
            *ptr.add(bytes.len()) = 0;
            GlobalUnlock(handle);
            Ok(buf)
        }
    }

    /// Give up ownership without freeing. Called only after the OS has
    /// accepted the block.
    fn into_raw(self) -> *mut core::ffi::c_void {
        let handle = self.0;
        std::mem::forget(self);
        handle
    }
}

impl Drop for GlobalBuf {
    fn drop(&mut self) {
        unsafe {
            GlobalFree(self.0);
        }
    }
}
