//! Stack introspection behind the `StackInspector` capability trait.
//!
//! The report builder never touches a real backtrace. It consumes two frame
//! sequences produced by an inspector:
//!
//! - the **caller chain**: the calls still active when the guard intercepted
//!   the failure, oldest first, with the guard's own frame excluded;
//! - the **failure chain**: the calls the failure unwound through, raise
//!   site first, with the wrapped callable's own frame excluded.
//!
//! [`BacktraceInspector`] is the production implementation. Tests substitute
//! an inspector returning synthetic frames, so report assembly can be
//! exercised without raising anything real.

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::frame::Frame;
use crate::raised::Capture;

/// Capability interface for turning stack captures into frame records.
pub trait StackInspector: Send + Sync {
    /// The chain of calls leading into the wrapped callable, in chronological
    /// order (outermost caller first). `interception` is the capture taken by
    /// the guard at the moment it observed the failure.
    fn caller_chain(&self, interception: &Capture) -> Result<Vec<Frame>, Error>;

    /// The calls the failure propagated through before reaching the wrapped
    /// callable, innermost (raise site) first. Empty when the failure was
    /// raised directly in the wrapped callable's own body.
    fn failure_chain(
        &self,
        raised: &Capture,
        interception: &Capture,
    ) -> Result<Vec<Frame>, Error>;
}

// ============================================================================
// BacktraceInspector - symbol resolution over `backtrace` captures
// ============================================================================

/// Inspector backed by the `backtrace` crate and on-disk source files.
///
/// Runtime scaffolding (std, the test harness, this crate's own frames) is
/// filtered out of both chains; what remains are the frames a developer
/// would recognize as their program. For each kept frame, one line of source
/// context is read from disk when the file is reachable.
#[derive(Debug, Clone)]
pub struct BacktraceInspector {
    read_context: bool,
}

impl BacktraceInspector {
    /// Inspector that attaches source context to every frame it can.
    pub fn new() -> Self {
        Self { read_context: true }
    }

    /// Skip source-file reads; frames render with an empty body.
    pub fn without_context(mut self) -> Self {
        self.read_context = false;
        self
    }

    /// Resolve a capture into user-level frames, innermost first.
    fn resolve_user(&self, capture: &Capture) -> Result<Vec<Frame>, Error> {
        let bt = capture.resolved();
        let mut frames = Vec::new();
        for frame in bt.frames() {
            for symbol in frame.symbols() {
                let Some(name) = symbol.name() else { continue };
                let name = name.to_string();
                let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                    continue;
                };
                if is_runtime_frame(&name, file) {
                    continue;
                }
                let mut record = Frame::new(file.display().to_string(), line, tidy_symbol(&name));
                if self.read_context {
                    record = record.with_context(read_context(file, line)?);
                }
                frames.push(record);
            }
        }
        log::trace!("resolved {} user frames from capture", frames.len());
        Ok(frames)
    }
}

impl Default for BacktraceInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl StackInspector for BacktraceInspector {
    fn caller_chain(&self, interception: &Capture) -> Result<Vec<Frame>, Error> {
        // The capture is innermost-first and the guard's own frames are
        // filtered as crate internals; reversing yields chronological order.
        let mut frames = self.resolve_user(interception)?;
        frames.reverse();
        Ok(frames)
    }

    fn failure_chain(
        &self,
        raised: &Capture,
        interception: &Capture,
    ) -> Result<Vec<Frame>, Error> {
        // Both captures share the caller chain as a suffix. Frames unique to
        // the raise-site capture are the ones the failure unwound through;
        // the deepest shared-adjacent frame is the wrapped callable itself,
        // which the caller chain already implies, so it is dropped too.
        let mut deep = self.resolve_user(raised)?;
        let outer = self.resolve_user(interception)?;
        let keep = deep
            .len()
            .saturating_sub(outer.len())
            .saturating_sub(1);
        deep.truncate(keep);
        Ok(deep)
    }
}

/// Module-path prefixes that mark a frame as runtime scaffolding.
const RUNTIME_PREFIXES: &[&str] = &[
    "faultline::",
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "test::",
];

fn is_runtime_frame(symbol: &str, file: &Path) -> bool {
    if RUNTIME_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
        return true;
    }
    if symbol.starts_with("__") || symbol.starts_with("rust_") || symbol.starts_with('<') {
        return true;
    }
    // Toolchain and registry sources are not the developer's program.
    let file = file.to_string_lossy();
    file.contains("/rustc/") || file.contains("/.cargo/registry/")
}

/// Demangled symbol to a bare function name: hash suffix stripped, closure
/// markers collapsed onto their enclosing function.
fn tidy_symbol(raw: &str) -> String {
    let base = match raw.rfind("::h") {
        Some(pos)
            if !raw[pos + 3..].is_empty()
                && raw[pos + 3..].chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            &raw[..pos]
        }
        _ => raw,
    };
    let mut segments: Vec<&str> = base.split("::").collect();
    while segments.last().is_some_and(|s| *s == "{{closure}}") {
        segments.pop();
    }
    segments.last().copied().unwrap_or(base).to_string()
}

/// One trimmed source line at `line`, or nothing when the file is missing
/// or the line is out of range. A read failure on an existing file is a
/// report-construction error and surfaces.
fn read_context(path: &Path, line: u32) -> Result<Vec<String>, Error> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|source| Error::Snippet {
        path: path.to_path_buf(),
        source,
    })?;
    let Some(index) = (line as usize).checked_sub(1) else {
        return Ok(Vec::new());
    };
    Ok(text
        .lines()
        .nth(index)
        .map(|l| l.trim().to_string())
        .into_iter()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tidy_symbol_strips_hash_and_path() {
        assert_eq!(tidy_symbol("myapp::db::find_user::h1a2b3c4d5e6f7a8b"), "find_user");
        assert_eq!(tidy_symbol("myapp::main"), "main");
        assert_eq!(tidy_symbol("plain"), "plain");
    }

    #[test]
    fn tidy_symbol_collapses_closures() {
        assert_eq!(
            tidy_symbol("tests::print_mode::{{closure}}::hdeadbeefdeadbeef"),
            "print_mode"
        );
        assert_eq!(tidy_symbol("a::b::{{closure}}::{{closure}}"), "b");
    }

    #[test]
    fn runtime_frames_are_filtered() {
        let user = Path::new("/work/app/src/main.rs");
        assert!(is_runtime_frame("std::rt::lang_start", user));
        assert!(is_runtime_frame("faultline::guard::call", user));
        assert!(is_runtime_frame(
            "myapp::run",
            Path::new("/rustc/abc123/library/std/src/rt.rs")
        ));
        assert!(!is_runtime_frame("myapp::run", user));
    }

    #[test]
    fn context_read_returns_trimmed_line() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "fn first() {{}}")?;
        writeln!(file, "    let x = compute();")?;
        let context = read_context(file.path(), 2)?;
        assert_eq!(context, vec!["let x = compute();".to_string()]);
        Ok(())
    }

    #[test]
    fn context_read_is_empty_for_missing_file_or_line() -> anyhow::Result<()> {
        assert!(read_context(Path::new("/no/such/file.rs"), 3)?.is_empty());
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "only line")?;
        assert!(read_context(file.path(), 12)?.is_empty());
        assert!(read_context(file.path(), 0)?.is_empty());
        Ok(())
    }
}
