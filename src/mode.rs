//! Reporting modes and their raw-integer boundary.
//!
//! The configuration surface is a single selector with exactly three legal
//! raw values: `-1` (propagate), `0` (print), `1` (interactive). Anything
//! else is rejected once, here, with an error naming the offending value;
//! the rest of the crate only ever sees the validated [`Mode`].

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// Policy chosen at wrap time governing what happens when a wrapped
/// callable fails.
///
/// The mode is fixed per [`Guard`](crate::Guard); changing it means
/// building a new guard.
///
/// ## Example
///
/// ```rust
/// use faultline::Mode;
///
/// assert_eq!(Mode::from_raw(-1).unwrap(), Mode::Propagate);
/// assert_eq!("1".parse::<Mode>().unwrap(), Mode::Interactive);
/// assert!(Mode::from_raw(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Re-raise the original failure unchanged; no report is built.
    #[default]
    Propagate,
    /// Print the report to the output sink, then suppress the failure.
    Print,
    /// Show the report in the interactive viewer, then suppress the failure.
    Interactive,
}

impl Mode {
    /// Validate a raw selector value.
    pub fn from_raw(raw: i32) -> Result<Self, Error> {
        match raw {
            -1 => Ok(Mode::Propagate),
            0 => Ok(Mode::Print),
            1 => Ok(Mode::Interactive),
            other => Err(Error::InvalidMode(other)),
        }
    }

    /// The raw selector value for this mode.
    pub const fn as_raw(self) -> i32 {
        match self {
            Mode::Propagate => -1,
            Mode::Print => 0,
            Mode::Interactive => 1,
        }
    }

    /// Whether a failure crosses the guard boundary in this mode.
    pub const fn propagates(self) -> bool {
        matches!(self, Mode::Propagate)
    }
}

impl TryFrom<i32> for Mode {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self, Error> {
        Mode::from_raw(raw)
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let raw: i32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidModeToken(s.to_string()))?;
        Mode::from_raw(raw)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Propagate => "propagate",
            Mode::Print => "print",
            Mode::Interactive => "interactive",
        })
    }
}
