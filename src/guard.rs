//! The `Guard`: interception, report construction, and mode dispatch.
//!
//! A guard is configured once (mode, inspector, sink, viewer) and then
//! applied to any number of callables. Each interception is independent;
//! the guard carries no mutable state across calls.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::inspect::{BacktraceInspector, StackInspector};
use crate::mode::Mode;
use crate::raised::{Capture, Raised};
use crate::report::Report;
use crate::viewer::{ConsoleViewer, Viewer};

// ============================================================================
// Outcome - what the call site observes after a guarded call
// ============================================================================

/// Result of a guarded call that did not propagate.
///
/// A suppressed failure is distinct from every legitimate return value:
/// a callee returning `0`, `""`, or `false` comes back as `Returned`,
/// never as `Suppressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The callable succeeded; its value, verbatim.
    Returned(T),
    /// The callable failed, the report was emitted, and the failure was
    /// consumed. There is no value.
    Suppressed,
}

impl<T> Outcome<T> {
    /// The returned value, if the call succeeded.
    pub fn returned(self) -> Option<T> {
        match self {
            Outcome::Returned(value) => Some(value),
            Outcome::Suppressed => None,
        }
    }

    /// Whether a failure was reported and consumed.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Outcome::Suppressed)
    }
}

// ============================================================================
// CallError - what can cross the guard boundary
// ============================================================================

/// Failure surface of a guarded call.
#[derive(Debug)]
pub enum CallError<E> {
    /// The original failure, re-raised verbatim. Only produced in
    /// [`Mode::Propagate`].
    Raised(Raised<E>),
    /// The guard machinery itself failed while building or emitting the
    /// report. Never swallowed behind the original failure.
    Fault(Error),
}

impl<E> From<Error> for CallError<E> {
    fn from(e: Error) -> Self {
        CallError::Fault(e)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for CallError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CallError::Raised(raised) => raised.fmt(f),
            CallError::Fault(err) => err.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for CallError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Raised(raised) => Some(raised),
            CallError::Fault(err) => Some(err),
        }
    }
}

// ============================================================================
// Guard
// ============================================================================

/// Shared output sink; `None` means the process's stdout.
type Sink = Option<Arc<Mutex<dyn Write + Send>>>;

/// A configured failure interceptor.
///
/// ## Example
///
/// ```rust
/// use faultline::{raise, Guard, Mode, Outcome, Raised};
///
/// #[derive(Debug)]
/// struct Boom;
///
/// impl std::fmt::Display for Boom {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "boom")
///     }
/// }
///
/// let guard = Guard::new(Mode::Propagate);
///
/// let ok = guard.call("double", || Ok::<_, Raised<Boom>>(21 * 2));
/// assert!(matches!(ok, Ok(Outcome::Returned(42))));
///
/// let failed = guard.call("explode", || Err::<i32, _>(raise(Boom)));
/// assert!(failed.is_err()); // propagated untouched, no report built
/// ```
pub struct Guard {
    mode: Mode,
    inspector: Box<dyn StackInspector>,
    sink: Sink,
    viewer: Box<dyn Viewer>,
}

impl Guard {
    /// Guard with the given mode and the default backtrace inspector,
    /// stdout sink, and console viewer.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            inspector: Box::new(BacktraceInspector::new()),
            sink: None,
            viewer: Box::new(ConsoleViewer::new()),
        }
    }

    /// Guard from a raw mode selector; rejects anything outside `{-1, 0, 1}`
    /// before any wrapping occurs.
    pub fn from_raw(raw: i32) -> Result<Self, Error> {
        Ok(Self::new(Mode::from_raw(raw)?))
    }

    /// The fixed reporting mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Replace the stack inspector.
    pub fn with_inspector(mut self, inspector: impl StackInspector + 'static) -> Self {
        self.inspector = Box::new(inspector);
        self
    }

    /// Redirect [`Mode::Print`] output away from stdout.
    pub fn with_sink(mut self, sink: Arc<Mutex<dyn Write + Send>>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the interactive viewer collaborator.
    pub fn with_viewer(mut self, viewer: impl Viewer + 'static) -> Self {
        self.viewer = Box::new(viewer);
        self
    }

    /// Run `f` under this guard.
    ///
    /// On success the callee's value comes back verbatim as
    /// [`Outcome::Returned`]. On failure the behavior is the guard's mode:
    /// `Propagate` re-raises the original [`Raised<E>`] with no report
    /// built at all; `Print` and `Interactive` emit the report and consume
    /// the failure, yielding [`Outcome::Suppressed`]; the call site cannot
    /// tell a suppressed failure from "succeeded with nothing to return",
    /// which is the documented contract of those modes.
    pub fn call<T, E, F>(&self, function: &str, f: F) -> Result<Outcome<T>, CallError<E>>
    where
        F: FnOnce() -> Result<T, Raised<E>>,
        E: core::fmt::Display,
    {
        match f() {
            Ok(value) => Ok(Outcome::Returned(value)),
            Err(raised) => {
                if self.mode.propagates() {
                    return Err(CallError::Raised(raised));
                }
                log::debug!(
                    "intercepted failure in `{function}`, dispatching via {} mode",
                    self.mode
                );
                let interception = Capture::here();
                let report = self.build_report(&raised, &interception, function)?;
                self.dispatch(&report)?;
                Ok(Outcome::Suppressed)
            }
        }
    }

    /// Wrap a single-argument callable, fixing its name and this guard.
    ///
    /// The returned closure borrows the guard; every invocation goes through
    /// [`call`](Self::call). Multi-argument callables take a tuple.
    pub fn wrap<A, T, E, F>(
        &self,
        function: impl Into<String>,
        mut f: F,
    ) -> impl FnMut(A) -> Result<Outcome<T>, CallError<E>>
    where
        F: FnMut(A) -> Result<T, Raised<E>>,
        E: core::fmt::Display,
    {
        let function = function.into();
        move |args| self.call(&function, || f(args))
    }

    fn build_report<E: core::fmt::Display>(
        &self,
        raised: &Raised<E>,
        interception: &Capture,
        function: &str,
    ) -> Result<Report, Error> {
        let caller = self.inspector.caller_chain(interception)?;
        let failure = self
            .inspector
            .failure_chain(raised.capture(), interception)?;
        Report::build(&caller, &failure, &raised.summary(), function)
    }

    /// Send a finished report to the sink selected by the mode.
    fn dispatch(&self, report: &Report) -> Result<(), Error> {
        match self.mode {
            // Propagate short-circuits before a report exists.
            Mode::Propagate => Ok(()),
            Mode::Print => match &self.sink {
                Some(sink) => {
                    let mut sink = match sink.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    sink.write_all(report.text().as_bytes()).map_err(Error::Sink)
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    out.write_all(report.text().as_bytes()).map_err(Error::Sink)
                }
            },
            // The report is already an in-memory buffer; the viewer gets the
            // whole text and the real output stream stays untouched.
            Mode::Interactive => self
                .viewer
                .show(report.text())
                .map_err(Error::Viewer),
        }
    }
}

impl Default for Guard {
    /// A propagating guard, matching the mode selector's default of `-1`.
    fn default() -> Self {
        Self::new(Mode::Propagate)
    }
}

impl core::fmt::Debug for Guard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Guard").field("mode", &self.mode).finish()
    }
}
