use std::io::Write;
use std::process::{Command, Stdio};

use crate::caption::prompt::CaptionPrompt;
use crate::foundation::error::{OverlayError, OverlayResult};

/// External text generator producing a caption for a prompt.
///
/// Implementations are called once per request and are not retried.
pub trait CaptionSource: Send + Sync {
    /// Produce raw caption text for `prompt`.
    fn generate(&self, prompt: &CaptionPrompt) -> OverlayResult<String>;
}

/// Source that ignores the prompt and returns a preset caption.
#[derive(Clone, Debug)]
pub struct FixedCaption(pub String);

impl CaptionSource for FixedCaption {
    fn generate(&self, _prompt: &CaptionPrompt) -> OverlayResult<String> {
        Ok(self.0.clone())
    }
}

/// Source that runs a program, writes the prompt to its stdin and reads the caption from stdout.
#[derive(Clone, Debug)]
pub struct CommandCaptionSource {
    program: String,
    args: Vec<String>,
}

impl CommandCaptionSource {
    /// Run `program` with `args` for every prompt.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl CaptionSource for CommandCaptionSource {
    fn generate(&self, prompt: &CaptionPrompt) -> OverlayResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                OverlayError::caption(format!("failed to spawn '{}': {e}", self.program))
            })?;

        // The prompt is fed from its own thread while stdout/stderr drain here, so a generator
        // that writes before it has read everything cannot fill both pipes and stall.
        let stdin = child.stdin.take();
        let text = prompt.text();
        let (written, out) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let out = child.wait_with_output();
            (writer.join(), out)
        });

        match written {
            Ok(Ok(())) => {}
            // A generator that exits without reading its input is not an error by itself.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => {
                return Err(OverlayError::caption(format!(
                    "write prompt to '{}': {e}",
                    self.program
                )));
            }
            Err(_) => {
                return Err(OverlayError::caption(format!(
                    "prompt writer for '{}' panicked",
                    self.program
                )));
            }
        }
        let out = out.map_err(|e| {
            OverlayError::caption(format!("wait for '{}': {e}", self.program))
        })?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(OverlayError::caption(format!(
                "'{}' exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            )));
        }

        String::from_utf8(out.stdout).map_err(|_| {
            OverlayError::caption(format!("'{}' produced non-UTF-8 output", self.program))
        })
    }
}

/// Normalize generator output: trim, drop one pair of wrapping quotes, reject empty results.
pub fn clean_caption(raw: &str) -> OverlayResult<String> {
    let mut s = raw.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if s.chars().count() >= 2
            && let Some(inner) = s.strip_prefix(open).and_then(|r| r.strip_suffix(close))
        {
            s = inner.trim();
            break;
        }
    }
    if s.is_empty() {
        return Err(OverlayError::caption("caption source returned an empty caption"));
    }
    Ok(s.to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/caption/source.rs"]
mod tests;
