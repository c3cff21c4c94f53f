//! X11 clipboard backend — read/write via `xclip`.
//!
//! Wraps `xclip -selection clipboard` for clipboard access so the
//! bridge works on X11 hosts without linking a display connection.
//! Format information comes from the selection's `TARGETS` list.
//!
//! X11 has no open/close clipboard lock, so sessions here are trivial
//! and acquisition never contends. Two contract deviations follow from
//! the selection model: clearing registers zero-length text rather
//! than unowning the selection (xclip has no disown operation), and
//! the format count includes the side-channel targets (`TARGETS`,
//! `TIMESTAMP`) every owner advertises.

use std::io::Write;
use std::process::{Child, Command, ExitStatus, Stdio};

use super::{ClipboardResource, ClipboardSession, ResourceError};

/// X11 implementation of [`ClipboardResource`] via `xclip`.
pub struct X11Clipboard;

impl X11Clipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for X11Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardResource for X11Clipboard {
    fn open(&self) -> Result<Box<dyn ClipboardSession + '_>, ResourceError> {
        // No OS-side lock to acquire; each xclip invocation is
        // self-contained.
        Ok(Box::new(X11Session))
    }

    fn text_available(&self) -> bool {
        selection_targets()
            .iter()
            .any(|target| is_text_target(target))
    }
}

struct X11Session;

impl ClipboardSession for X11Session {
    fn read(&mut self) -> Result<Option<Vec<u8>>, ResourceError> {
        let output = Command::new("xclip")
            .args(["-selection", "clipboard", "-o"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| ResourceError::Backend(format!("failed to spawn xclip -o: {e}")))?;

        if output.status.success() {
            Ok(Some(output.stdout))
        } else {
            // xclip -o exits non-zero when the selection has no owner.
            Ok(None)
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ResourceError> {
        let child = Command::new("xclip")
            .args(["-selection", "clipboard"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ResourceError::Backend(format!("failed to spawn xclip: {e}")))?;

        let status = feed_and_wait(child, bytes)?;

        if status.success() {
            Ok(())
        } else {
            Err(ResourceError::Backend(format!(
                "xclip exited with status {status}"
            )))
        }
    }

    /// Closest xclip equivalent of emptying: own the selection with
    /// zero-length content. The owner still advertises its targets
    /// afterward, so `format_count` stays non-zero and text queries
    /// keep reporting (empty) text — xclip has no disown operation.
    fn clear(&mut self) -> Result<(), ResourceError> {
        self.write(&[])
    }

    fn format_count(&mut self) -> usize {
        selection_targets().len()
    }
}

/// Pipe `bytes` into a spawned child's stdin and wait for it to exit.
///
/// The child is always reaped: if the pipe write fails (the child died
/// or closed stdin early) it is killed and waited on before the error
/// returns, so no error branch leaves a zombie behind.
fn feed_and_wait(mut child: Child, bytes: &[u8]) -> Result<ExitStatus, ResourceError> {
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(bytes) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ResourceError::Backend(format!(
                "failed to write to xclip: {e}"
            )));
        }
        // Drop stdin to close the pipe so the child can finish.
    }

    child
        .wait()
        .map_err(|e| ResourceError::Backend(format!("failed to wait for xclip: {e}")))
}

/// Targets currently advertised by the clipboard selection owner, or
/// empty if the selection is unowned or xclip is unavailable.
fn selection_targets() -> Vec<String> {
    let output = Command::new("xclip")
        .args(["-selection", "clipboard", "-o", "-t", "TARGETS"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => parse_targets(&out.stdout),
        _ => Vec::new(),
    }
}

/// Parse `xclip -o -t TARGETS` output: one target atom name per line.
fn parse_targets(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Whether a target atom carries plain text.
fn is_text_target(target: &str) -> bool {
    matches!(target, "UTF8_STRING" | "STRING" | "TEXT" | "text/plain")
        || target.starts_with("text/plain;")
}
