//! Cross-language clipboard bridge.
//!
//! Exposes the host clipboard as six text-oriented operations — read,
//! write, clear, has-text, is-empty, format-count — so that a caller
//! without OS API bindings can do clipboard I/O through a small, stable
//! surface. The [`ClipboardAccessor`] owns the acquire/use/release
//! bracket and the bounded retry on transient contention; the actual
//! platform mechanism lives behind the [`ClipboardResource`] trait so
//! the accessor logic is testable without a real clipboard.
//!
//! Built as both a Rust library and a `cdylib`; the [`ffi`] module
//! carries the C ABI (`scb_*`) that foreign callers link against.

pub mod accessor;
pub mod ffi;
pub mod resource;
pub mod retry;

pub use accessor::ClipboardAccessor;
pub use resource::{ClipboardResource, ClipboardSession, ResourceError, SystemClipboard};
pub use retry::RetryPolicy;
