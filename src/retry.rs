//! Bounded retry with a fixed inter-attempt delay.
//!
//! The clipboard is a shared OS resource that another process may hold
//! at any moment, so every acquiring operation runs under the same
//! policy: a small number of attempts with a short blocking sleep
//! between failures. The policy is defined once here and applied by
//! [`crate::ClipboardAccessor`].

use std::time::Duration;

/// Attempt budget and inter-attempt delay for clipboard acquisition.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero means the operation
    /// is never tried and immediately fails.
    pub attempts: u32,
    /// Blocking sleep between a failed attempt and the next one.
    /// No sleep follows the final attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(10),
        }
    }
}

/// Run `op` until it succeeds or the attempt budget is exhausted.
///
/// Returns the first `Ok` value, or `None` after `policy.attempts`
/// failures. Sleeps `policy.delay` between failed attempts; the calling
/// thread blocks for the whole duration.
pub(crate) fn with_backoff<T, E>(
    policy: RetryPolicy,
    mut op: impl FnMut() -> Result<T, E>,
) -> Option<T> {
    for attempt in 1..=policy.attempts {
        if let Ok(value) = op() {
            return Some(value);
        }
        if attempt < policy.attempts {
            std::thread::sleep(policy.delay);
        }
    }
    None
}
