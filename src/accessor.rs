//! Clipboard accessor — the six bridge operations.
//!
//! [`ClipboardAccessor`] mediates every interaction with the clipboard
//! resource: it applies the shared retry policy to acquisition, keeps
//! each use inside one open session bracket, and absorbs every failure
//! into the documented default return value. No error type crosses
//! this boundary; callers only ever see `Option`/`bool`/count results.

use crate::resource::{ClipboardResource, ResourceError, SystemClipboard};
use crate::retry::{self, RetryPolicy};

/// Safe accessor over an injected [`ClipboardResource`].
///
/// All operations are synchronous and block the calling thread,
/// including the fixed sleep between acquisition retries. The accessor
/// holds no state of its own beyond the resource and policy; within a
/// process, concurrent calls are serialized only by the OS clipboard
/// lock itself.
pub struct ClipboardAccessor<R: ClipboardResource> {
    resource: R,
    policy: RetryPolicy,
}

impl ClipboardAccessor<SystemClipboard> {
    /// Accessor over the build target's real clipboard, with the
    /// default retry policy.
    pub fn system() -> Self {
        Self::new(SystemClipboard::new())
    }
}

impl<R: ClipboardResource> ClipboardAccessor<R> {
    pub fn new(resource: R) -> Self {
        Self::with_policy(resource, RetryPolicy::default())
    }

    pub fn with_policy(resource: R, policy: RetryPolicy) -> Self {
        Self { resource, policy }
    }

    /// Current plain-text content as a caller-owned string.
    ///
    /// `None` covers every unobservable or absent case: no plain-text
    /// format registered, content lock failure, or the clipboard
    /// staying busy through the whole retry budget. Acquisition
    /// success with absent text ends the retry loop; only failure to
    /// acquire is retried. Non-UTF-8 bytes are replaced; callers that
    /// need the raw payload use [`read_bytes`](Self::read_bytes).
    pub fn read_text(&self) -> Option<String> {
        self.read_bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Current plain-text content as caller-owned bytes, unmodified.
    ///
    /// The byte-level entry point behind [`read_text`](Self::read_text)
    /// and the C surface, which must hand single-byte text back exactly
    /// as it was stored.
    pub fn read_bytes(&self) -> Option<Vec<u8>> {
        let outcome = retry::with_backoff(self.policy, || {
            let mut session = self.resource.open()?;
            // Acquired: the attempt is final whatever the read yields.
            Ok::<_, ResourceError>(session.read().ok().flatten())
        });
        match outcome {
            Some(present) => present,
            None => {
                tracing::debug!("clipboard unavailable after retries, reporting no text");
                None
            }
        }
    }

    /// Replace the clipboard content with `text`.
    ///
    /// Each attempt prepares the payload, acquires the clipboard,
    /// clears existing content, and registers the new content; any
    /// failure inside the attempt releases what that attempt prepared
    /// and the whole sequence is retried. `true` only if registration
    /// succeeded.
    pub fn write_text(&self, text: &str) -> bool {
        self.write_bytes(text.as_bytes())
    }

    /// Replace the clipboard content with raw single-byte text.
    ///
    /// Same behavior as [`write_text`](Self::write_text); the bytes are
    /// registered exactly as given, with no encoding conversion.
    pub fn write_bytes(&self, bytes: &[u8]) -> bool {
        let outcome = retry::with_backoff(self.policy, || {
            let mut session = self.resource.open()?;
            session.write(bytes)
        });
        if outcome.is_none() {
            tracing::debug!(len = bytes.len(), "clipboard write failed after retries");
        }
        outcome.is_some()
    }

    /// Empty the clipboard. `true` only if acquisition and the empty
    /// operation both succeeded within one attempt.
    pub fn clear(&self) -> bool {
        let outcome = retry::with_backoff(self.policy, || {
            let mut session = self.resource.open()?;
            session.clear()
        });
        outcome.is_some()
    }

    /// Whether plain-text content is currently available. A single
    /// session-less query; no retry.
    pub fn has_text(&self) -> bool {
        self.resource.text_available()
    }

    /// Whether the clipboard holds no formats at all.
    ///
    /// Single acquisition attempt. If the clipboard cannot be acquired
    /// the true state is unobservable and this reports `true` — the
    /// caller cannot distinguish "genuinely empty" from "busy", a
    /// known limitation of the bridge contract.
    pub fn is_empty(&self) -> bool {
        match self.resource.open() {
            Ok(mut session) => session.format_count() == 0,
            Err(e) => {
                tracing::trace!(error = %e, "clipboard unavailable, reporting empty");
                true
            }
        }
    }

    /// Number of distinct formats currently registered, or `0` if the
    /// clipboard cannot be acquired. Single attempt; no retry.
    pub fn format_count(&self) -> usize {
        match self.resource.open() {
            Ok(mut session) => session.format_count(),
            Err(e) => {
                tracing::trace!(error = %e, "clipboard unavailable, reporting zero formats");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::resource::ClipboardSession;

    #[derive(Default)]
    struct FakeState {
        /// Registered plain-text content. `Some(vec![])` is empty text,
        /// distinct from no text at all.
        text: Option<Vec<u8>>,
        /// Non-text formats registered alongside the text.
        extra_formats: usize,
        /// Number of upcoming open attempts that fail busy.
        busy_attempts: usize,
        /// Reject every write, as if registration failed.
        fail_writes: bool,
        opens_attempted: usize,
        opens_succeeded: usize,
        closes: usize,
    }

    /// In-memory stand-in for the OS clipboard, instrumented so tests
    /// can observe the retry budget and the open/close balance.
    #[derive(Default)]
    struct FakeClipboard {
        state: Mutex<FakeState>,
    }

    impl FakeClipboard {
        fn with_text(text: &str) -> Self {
            let fake = Self::default();
            fake.state.lock().unwrap().text = Some(text.as_bytes().to_vec());
            fake
        }

        fn busy_for(attempts: usize) -> Self {
            let fake = Self::default();
            fake.state.lock().unwrap().busy_attempts = attempts;
            fake
        }

        fn always_busy() -> Self {
            Self::busy_for(usize::MAX)
        }
    }

    impl ClipboardResource for FakeClipboard {
        fn open(&self) -> Result<Box<dyn ClipboardSession + '_>, ResourceError> {
            let mut state = self.state.lock().unwrap();
            state.opens_attempted += 1;
            if state.busy_attempts > 0 {
                state.busy_attempts -= 1;
                return Err(ResourceError::Busy("held by another process".into()));
            }
            state.opens_succeeded += 1;
            drop(state);
            Ok(Box::new(FakeSession { owner: self }))
        }

        fn text_available(&self) -> bool {
            self.state.lock().unwrap().text.is_some()
        }
    }

    struct FakeSession<'a> {
        owner: &'a FakeClipboard,
    }

    impl Drop for FakeSession<'_> {
        fn drop(&mut self) {
            self.owner.state.lock().unwrap().closes += 1;
        }
    }

    impl ClipboardSession for FakeSession<'_> {
        fn read(&mut self) -> Result<Option<Vec<u8>>, ResourceError> {
            Ok(self.owner.state.lock().unwrap().text.clone())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<(), ResourceError> {
            let mut state = self.owner.state.lock().unwrap();
            if state.fail_writes {
                return Err(ResourceError::Backend("registration rejected".into()));
            }
            state.text = Some(bytes.to_vec());
            Ok(())
        }

        fn clear(&mut self) -> Result<(), ResourceError> {
            let mut state = self.owner.state.lock().unwrap();
            state.text = None;
            state.extra_formats = 0;
            Ok(())
        }

        fn format_count(&mut self) -> usize {
            let state = self.owner.state.lock().unwrap();
            usize::from(state.text.is_some()) + state.extra_formats
        }
    }

    /// Default budget (3 attempts) with no delay so tests don't sleep.
    fn accessor(fake: FakeClipboard) -> ClipboardAccessor<FakeClipboard> {
        ClipboardAccessor::with_policy(
            fake,
            RetryPolicy {
                attempts: 3,
                delay: Duration::ZERO,
            },
        )
    }

    #[test]
    fn write_then_read_round_trips() {
        let acc = accessor(FakeClipboard::default());
        assert!(acc.write_text("hello"));
        assert_eq!(acc.read_text().as_deref(), Some("hello"));
        assert!(acc.has_text());
        assert!(acc.format_count() >= 1);
        assert!(!acc.is_empty());
    }

    #[test]
    fn empty_string_round_trips_as_present_text() {
        let acc = accessor(FakeClipboard::default());
        assert!(acc.write_text(""));
        // Zero-length text is still text, not "absent".
        assert_eq!(acc.read_text().as_deref(), Some(""));
        assert!(acc.has_text());
    }

    #[test]
    fn non_utf8_bytes_round_trip_unmodified() {
        let acc = accessor(FakeClipboard::default());
        // Latin-1 "café" — valid single-byte text, not valid UTF-8.
        let payload = b"caf\xE9";

        assert!(acc.write_bytes(payload));
        assert_eq!(acc.read_bytes().as_deref(), Some(payload.as_slice()));
        // The stored bytes are exactly what was written, no
        // replacement characters.
        assert_eq!(
            acc.resource.state.lock().unwrap().text.as_deref(),
            Some(payload.as_slice())
        );
        // Only the String-typed view substitutes the invalid byte.
        assert_eq!(acc.read_text().as_deref(), Some("caf\u{FFFD}"));
    }

    #[test]
    fn read_without_text_is_none() {
        let acc = accessor(FakeClipboard::default());
        assert_eq!(acc.read_text(), None);
        assert!(!acc.has_text());
    }

    #[test]
    fn clear_removes_all_content() {
        let acc = accessor(FakeClipboard::with_text("stale"));
        acc.resource.state.lock().unwrap().extra_formats = 2;

        assert!(acc.clear());
        assert!(!acc.has_text());
        assert_eq!(acc.format_count(), 0);
        assert!(acc.is_empty());
        assert_eq!(acc.read_text(), None);
    }

    #[test]
    fn clear_on_empty_clipboard_succeeds() {
        let acc = accessor(FakeClipboard::default());
        assert!(acc.clear());
        assert!(acc.is_empty());
        assert_eq!(acc.format_count(), 0);
        assert_eq!(acc.read_text(), None);
    }

    #[test]
    fn is_empty_agrees_with_format_count() {
        let acc = accessor(FakeClipboard::default());
        assert_eq!(acc.format_count(), 0);
        assert!(acc.is_empty());

        acc.resource.state.lock().unwrap().extra_formats = 3;
        assert_eq!(acc.format_count(), 3);
        assert!(!acc.is_empty());
    }

    #[test]
    fn busy_read_exhausts_budget_and_reports_no_text() {
        let acc = accessor(FakeClipboard::always_busy());
        assert_eq!(acc.read_text(), None);

        let state = acc.resource.state.lock().unwrap();
        assert_eq!(state.opens_attempted, 3);
        assert_eq!(state.opens_succeeded, 0);
        assert_eq!(state.closes, 0);
    }

    #[test]
    fn busy_write_exhausts_budget_and_fails() {
        let acc = accessor(FakeClipboard::always_busy());
        assert!(!acc.write_text("hello"));
        assert_eq!(acc.resource.state.lock().unwrap().opens_attempted, 3);
    }

    #[test]
    fn busy_clear_exhausts_budget_and_fails() {
        let acc = accessor(FakeClipboard::always_busy());
        assert!(!acc.clear());
        assert_eq!(acc.resource.state.lock().unwrap().opens_attempted, 3);
    }

    #[test]
    fn busy_queries_use_single_attempt_and_fail_safe() {
        let acc = accessor(FakeClipboard::always_busy());

        assert!(acc.is_empty());
        assert_eq!(acc.resource.state.lock().unwrap().opens_attempted, 1);

        assert_eq!(acc.format_count(), 0);
        assert_eq!(acc.resource.state.lock().unwrap().opens_attempted, 2);
    }

    #[test]
    fn has_text_never_opens_the_clipboard() {
        let acc = accessor(FakeClipboard::with_text("hello"));
        assert!(acc.has_text());
        assert_eq!(acc.resource.state.lock().unwrap().opens_attempted, 0);
    }

    #[test]
    fn transient_contention_recovers_within_budget() {
        let acc = accessor(FakeClipboard::busy_for(2));
        assert!(acc.write_text("eventually"));
        assert_eq!(acc.resource.state.lock().unwrap().opens_attempted, 3);
        assert_eq!(acc.read_text().as_deref(), Some("eventually"));
    }

    #[test]
    fn registration_failure_retries_and_releases_every_session() {
        let acc = accessor(FakeClipboard::default());
        acc.resource.state.lock().unwrap().fail_writes = true;

        assert!(!acc.write_text("rejected"));

        let state = acc.resource.state.lock().unwrap();
        // Each attempt acquired and released its own session.
        assert_eq!(state.opens_succeeded, 3);
        assert_eq!(state.closes, 3);
        assert_eq!(state.text, None);
    }

    #[test]
    fn every_successful_open_is_released() {
        let acc = accessor(FakeClipboard::default());
        acc.write_text("a");
        acc.read_text();
        acc.clear();
        acc.is_empty();
        acc.format_count();

        let state = acc.resource.state.lock().unwrap();
        assert!(state.opens_succeeded > 0);
        assert_eq!(state.closes, state.opens_succeeded);
    }
}
