//! The `Raised<E>` failure wrapper and stack captures.
//!
//! A wrapped callable signals failure by returning `Err(Raised<E>)`. The
//! wrapper stores the error inline and records a [`Capture`] of the call
//! stack at construction time; that capture *is* the failure's propagation
//! chain, later resolved into frames by a
//! [`StackInspector`](crate::StackInspector).

use core::fmt;

use backtrace::Backtrace;

use crate::report::FailureSummary;

// ============================================================================
// Capture - raw, unresolved stack snapshot
// ============================================================================

/// An unresolved snapshot of the call stack at one moment.
///
/// Capturing is comparatively cheap; symbol resolution is deferred until a
/// report is actually built, which only happens on the failure path of a
/// printing mode.
pub struct Capture {
    inner: Backtrace,
}

impl Capture {
    /// Snapshot the current call stack.
    #[inline]
    pub fn here() -> Self {
        Self {
            inner: Backtrace::new_unresolved(),
        }
    }

    /// Number of raw frames in the snapshot.
    pub fn depth(&self) -> usize {
        self.inner.frames().len()
    }

    /// Resolve symbols on a copy of the snapshot.
    ///
    /// The capture itself stays untouched; resolution happens on a clone so
    /// a `Raised<E>` can be inspected repeatedly and concurrently.
    pub(crate) fn resolved(&self) -> Backtrace {
        let mut bt = self.inner.clone();
        bt.resolve();
        bt
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capture({} frames)", self.depth())
    }
}

// ============================================================================
// Raised<E> - failure wrapper
// ============================================================================

/// A failure with its propagation chain attached.
///
/// The error `E` is stored inline; the capture rides along untouched as the
/// failure crosses function boundaries, so the raise site stays recorded no
/// matter how far the value travels.
///
/// ## Example
///
/// ```rust
/// use faultline::{raise, Raised};
///
/// #[derive(Debug)]
/// struct NotFound;
///
/// impl std::fmt::Display for NotFound {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "not found")
///     }
/// }
///
/// fn lookup() -> Result<u32, Raised<NotFound>> {
///     Err(raise(NotFound))
/// }
///
/// let err = lookup().unwrap_err();
/// assert_eq!(err.to_string(), "not found");
/// assert!(err.capture().depth() > 0);
/// ```
pub struct Raised<E> {
    error: E,
    capture: Capture,
}

impl<E> Raised<E> {
    /// Wrap an error and capture the current stack as its raise site.
    #[inline]
    pub fn new(error: E) -> Self {
        Self {
            error,
            capture: Capture::here(),
        }
    }

    /// The wrapped error.
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Unwrap, discarding the capture.
    pub fn into_inner(self) -> E {
        self.error
    }

    /// The stack snapshot taken when the failure was raised.
    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// Convert the error type, keeping the original raise-site capture.
    pub fn map<O>(self, f: impl FnOnce(E) -> O) -> Raised<O> {
        Raised {
            error: f(self.error),
            capture: self.capture,
        }
    }
}

impl<E: fmt::Display> Raised<E> {
    /// One-line class-and-message summary for the report trailer.
    pub fn summary(&self) -> FailureSummary {
        FailureSummary::new(short_type_name::<E>(), self.error.to_string())
    }
}

impl<E: fmt::Display> fmt::Display for Raised<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<E: fmt::Debug> fmt::Debug for Raised<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("error", &self.error)
            .field("capture", &self.capture)
            .finish()
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Raised<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Wrap any error value in [`Raised<E>`], capturing the raise site.
#[inline]
pub fn raise<E>(error: E) -> Raised<E> {
    Raised::new(error)
}

// ============================================================================
// ResultRaiseExt - for starting a capture on plain Results
// ============================================================================

/// Extension trait for converting `Result<T, E>` into `Result<T, Raised<E>>`
/// without `map_err` boilerplate.
///
/// ```rust
/// use faultline::{Raised, ResultRaiseExt};
///
/// fn parse(s: &str) -> Result<i32, Raised<std::num::ParseIntError>> {
///     s.parse::<i32>().raised()
/// }
///
/// assert!(parse("12").is_ok());
/// assert!(parse("nope").is_err());
/// ```
pub trait ResultRaiseExt<T, E> {
    /// Capture the caller's stack on the error path.
    fn raised(self) -> Result<T, Raised<E>>;
}

impl<T, E> ResultRaiseExt<T, E> for Result<T, E> {
    #[inline]
    fn raised(self) -> Result<T, Raised<E>> {
        self.map_err(Raised::new)
    }
}

/// Bare name of a type, without module path or generic arguments.
pub(crate) fn short_type_name<E: ?Sized>() -> &'static str {
    let full = core::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
