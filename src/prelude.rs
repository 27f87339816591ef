//! Convenience re-exports for the common path.
//!
//! ```rust
//! use faultline::prelude::*;
//! ```

pub use crate::frame::Frame;
pub use crate::guard::{CallError, Guard, Outcome};
pub use crate::mode::Mode;
pub use crate::raised::{Raised, ResultRaiseExt, raise};
pub use crate::report::Report;
pub use crate::table::{MethodTable, guard_table};
