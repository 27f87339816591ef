//! Error taxonomy for the guard machinery itself.
//!
//! These errors are about *faultline* misbehaving or being misconfigured, not
//! about the failures it reports on. The failure raised by a wrapped callable
//! is carried separately as [`Raised<E>`](crate::Raised) inside
//! [`CallError`](crate::CallError).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by configuration, table composition, and report assembly.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A raw mode value outside `{-1, 0, 1}` was supplied at wrap time.
    #[error("mode = \"{0}\" needs to be one of -1, 0 or 1")]
    InvalidMode(i32),

    /// A mode token that does not parse as an integer was supplied.
    #[error("mode = \"{0}\" needs to be an integer")]
    InvalidModeToken(String),

    /// The table-wide combinator was handed a bare function member.
    #[error("expected a method table, got a bare function member")]
    NotATable,

    /// A guarded table was invoked with a name it does not contain.
    #[error("no method named \"{method}\" in table \"{table}\"")]
    NoSuchMethod {
        /// Name of the guarded table.
        table: String,
        /// Requested method name.
        method: String,
    },

    /// A source file existed but its context line could not be read.
    ///
    /// Reporting bugs are never masked behind the failure being reported,
    /// so this surfaces instead of being swallowed.
    #[error("failed to read source context from {}", path.display())]
    Snippet {
        /// File the inspector tried to read.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the finished report to the output sink failed.
    #[error("failed to write report to the output sink")]
    Sink(#[source] io::Error),

    /// The interactive viewer failed while displaying the report.
    #[error("viewer failed to display the report")]
    Viewer(#[source] io::Error),

    /// Assembling the report text failed.
    #[error("failed to assemble report text")]
    Format(#[from] std::fmt::Error),
}
