//! # faultline - post-mortem failure reports with two frame chains
//!
//! Wrap a callable once and get, on failure, a structured report of **how
//! execution got there** (the caller chain) and **where the failure came
//! from** (the raise-site chain), richer context than a bare backtrace,
//! with a choice of three behaviors fixed at wrap time:
//!
//! | Mode | Raw | On failure |
//! |------|-----|-----------|
//! | [`Mode::Propagate`] | `-1` | re-raise untouched, build nothing |
//! | [`Mode::Print`] | `0` | print the report, consume the failure |
//! | [`Mode::Interactive`] | `1` | show the report in a console viewer, consume the failure |
//!
//! ```text
//! Filename caller: SRC/MAIN.RS
//!
//! ERROR - <load_config>:
//! ----------------------------------------------------------------------
//! Start at:
//!
//! line 8 in main:
//!     run(&args)
//!
//! ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
//! <- Exception raise: ParseError ->
//! ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
//!
//! line 31 in read_value:
//!     field.parse()?
//!
//! ParseError: invalid digit
//! ----------------------------------------------------------------------
//! ```
//!
//! ## Try It Now
//!
//! Raise failures with [`raise()`] (or `.raised()` on any `Result`) and run
//! them under a [`Guard`]:
//!
//! ```rust
//! use faultline::{raise, Guard, Mode, Outcome, Raised};
//!
//! #[derive(Debug)]
//! struct NoSuchUser(u64);
//!
//! impl std::fmt::Display for NoSuchUser {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "no user with id {}", self.0)
//!     }
//! }
//!
//! fn find_user(id: u64) -> Result<String, Raised<NoSuchUser>> {
//!     if id == 0 {
//!         return Err(raise(NoSuchUser(id)));
//!     }
//!     Ok(format!("user {id}"))
//! }
//!
//! let guard = Guard::new(Mode::Propagate);
//!
//! // Success passes the value through verbatim.
//! let ok = guard.call("find_user", || find_user(7));
//! assert!(matches!(ok, Ok(Outcome::Returned(_))));
//!
//! // Propagate re-raises the original failure; no report is built.
//! let err = guard.call("find_user", || find_user(0));
//! assert!(err.is_err());
//! ```
//!
//! ## The Two Chains
//!
//! The report separates two frame sequences with opposite orientations:
//!
//! - **Caller chain** (`Start at:` section): the calls still active when
//!   the guard intercepted the failure, *chronological*: outermost caller
//!   first, ending at the immediate caller of the wrapped callable. The
//!   guard's own frame never appears.
//! - **Failure chain** (below the `Exception raise` banner): the calls the
//!   failure unwound through, *raise site first*. The wrapped callable's
//!   own frame is excluded (the caller chain's tail already implies it),
//!   so a failure raised directly in the wrapped body yields an empty
//!   section.
//!
//! ## Suppression Contract
//!
//! In the two printing modes the original failure is fully consumed after
//! the report is emitted: the call site gets [`Outcome::Suppressed`] and
//! cannot distinguish "failed and was reported" from "succeeded with
//! nothing to return". Code that needs the value must treat those alike,
//! or use [`Mode::Propagate`]. A successful call always returns the
//! callee's value verbatim: `0`, `""`, and `false` are values, not
//! suppressions.
//!
//! ## Table-Wide Guarding
//!
//! [`guard_table()`] applies one shared guard across a whole
//! [`MethodTable`] in a single pure composition step; nested tables are
//! carried over unguarded. See the [`table`](crate::table) module.
//!
//! ## Testing Reports
//!
//! Report assembly depends only on the [`StackInspector`] capability
//! trait, so it can be driven with synthetic [`Frame`] sequences: no real
//! failures, no debug info, byte-for-byte reproducible output.

mod error;
mod frame;
mod guard;
mod inspect;
mod mode;
pub mod prelude;
mod raised;
mod report;
pub mod table;
mod viewer;

pub use error::Error;
pub use frame::Frame;
pub use guard::{CallError, Guard, Outcome};
pub use inspect::{BacktraceInspector, StackInspector};
pub use mode::Mode;
pub use raised::{Capture, Raised, ResultRaiseExt, raise};
pub use report::{FailureSummary, Report};
pub use table::{GuardedTable, Member, MemberFn, MethodTable, guard_member, guard_table};
pub use viewer::{ConsoleViewer, Viewer};

#[cfg(test)]
mod tests;
