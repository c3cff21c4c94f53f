//! Clipboard resource abstraction — pluggable platform backends.
//!
//! The clipboard is a system-owned, globally shared slot that this
//! crate never creates or destroys; it only acquires transient access.
//! [`ClipboardResource`] models that access as a capability: `open()`
//! hands out a [`ClipboardSession`] whose `Drop` releases the OS-side
//! handle, so every successful acquisition is paired with exactly one
//! release no matter which path returns.
//!
//! Payloads cross this boundary as raw bytes. Only single-byte plain
//! text is carried; no wide-text format is registered or queried.

#[cfg(windows)]
pub mod win32;
#[cfg(unix)]
pub mod x11;

/// Errors surfaced by a backend. Internal to the crate: the accessor
/// absorbs every variant into its documented default return values.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The clipboard could not be acquired this attempt (held by
    /// another process or thread). Retryable.
    #[error("clipboard busy: {0}")]
    Busy(String),

    /// Memory for a write could not be allocated or locked.
    #[error("allocation: {0}")]
    Alloc(String),

    /// Any other backend failure (registration rejected, helper
    /// process missing, pipe error).
    #[error("clipboard: {0}")]
    Backend(String),
}

/// Transient access to the system clipboard.
///
/// Backends implement this per platform; the accessor and its tests
/// only ever see the trait.
pub trait ClipboardResource {
    /// Acquire the clipboard. `Err` means this attempt failed and may
    /// be retried. The returned session releases the acquisition when
    /// dropped.
    fn open(&self) -> Result<Box<dyn ClipboardSession + '_>, ResourceError>;

    /// Whether plain-text content is currently available. Defined to
    /// be safe without an open session on every supported platform.
    fn text_available(&self) -> bool;
}

/// One open acquisition bracket. All methods operate on the clipboard
/// state observed while the session is held; dropping the session
/// closes the bracket.
pub trait ClipboardSession {
    /// Current plain-text content as a fresh caller-owned copy, or
    /// `None` if no plain-text format is registered.
    fn read(&mut self) -> Result<Option<Vec<u8>>, ResourceError>;

    /// Clear existing content and register `bytes` as the new
    /// plain-text content. On `Ok` the backend has handed ownership of
    /// any prepared memory to the OS; on `Err` it has released it.
    fn write(&mut self, bytes: &[u8]) -> Result<(), ResourceError>;

    /// Empty the clipboard.
    fn clear(&mut self) -> Result<(), ResourceError>;

    /// Number of distinct formats currently registered.
    fn format_count(&mut self) -> usize;
}

/// Default backend for the build target.
#[cfg(windows)]
pub type SystemClipboard = win32::Win32Clipboard;

/// Default backend for the build target.
#[cfg(unix)]
pub type SystemClipboard = x11::X11Clipboard;
