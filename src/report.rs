//! Report assembly: header, caller section, raise banner, failure section,
//! summary.
//!
//! A [`Report`] exists only for the duration of one failure. It is plain
//! text, assembled deterministically from two frame sequences and a
//! [`FailureSummary`], so the full layout can be golden-tested with
//! synthetic frames.

use core::fmt;
use core::fmt::Write as _;

use crate::error::Error;
use crate::frame::Frame;

/// Width of the horizontal rule lines framing a report.
pub(crate) const RULE_WIDTH: usize = 70;

/// Placeholder when the caller chain has no originating file to name.
const UNKNOWN_ORIGIN: &str = "<UNKNOWN>";

/// Failure class name and primary message, as shown in the raise banner and
/// the report trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummary {
    /// Bare name of the failure's type.
    pub name: String,
    /// Rendered message; may be empty, in which case the trailer shows the
    /// name alone instead of failing.
    pub message: String,
}

impl FailureSummary {
    /// Build a summary from a name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A finished, render-ready failure report.
///
/// Layout, top to bottom:
///
/// ```text
/// Filename caller: SRC/MAIN.RS
///
/// ERROR - <load_config>:
/// ----------------------------------------------------------------------
/// Start at:
///
/// line 8 in main:
///     run(&args)
///
/// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
/// <- Exception raise: ParseError ->
/// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
///
/// line 31 in read_value:
///     field.parse()?
///
/// ParseError: invalid digit
/// ----------------------------------------------------------------------
/// ```
///
/// The caller section is chronological (outermost caller first); the
/// failure section is in unwind order (raise site first) and never contains
/// the wrapped callable's own frame; when the failure originated right in
/// the wrapped callable, that section is legitimately empty.
pub struct Report {
    text: String,
}

impl Report {
    /// Assemble the report text.
    ///
    /// `caller` is the chronological caller chain, `failure` the unwind-order
    /// failure chain, `function` the wrapped callable's name. Assembly
    /// failures propagate; a report about a broken reporter would hide both
    /// problems.
    pub fn build(
        caller: &[Frame],
        failure: &[Frame],
        summary: &FailureSummary,
        function: &str,
    ) -> Result<Self, Error> {
        let mut text = String::new();

        let origin = caller
            .first()
            .map(|frame| frame.file.to_uppercase())
            .unwrap_or_else(|| UNKNOWN_ORIGIN.to_string());
        writeln!(text, "Filename caller: {origin}")?;
        writeln!(text)?;
        writeln!(text, "ERROR - <{function}>:")?;
        writeln!(text, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(text, "Start at:")?;
        writeln!(text)?;

        for frame in caller {
            writeln!(text, "{frame}")?;
            writeln!(text)?;
        }

        let banner = format!("<- Exception raise: {} ->", summary.name);
        let tilde = "~".repeat(banner.chars().count());
        writeln!(text, "{tilde}")?;
        writeln!(text, "{banner}")?;
        writeln!(text, "{tilde}")?;
        writeln!(text)?;

        for frame in failure {
            writeln!(text, "{frame}")?;
            writeln!(text)?;
        }

        if summary.message.is_empty() {
            writeln!(text, "{}", summary.name)?;
        } else {
            writeln!(text, "{}: {}", summary.name, summary.message)?;
        }
        writeln!(text, "{}", "-".repeat(RULE_WIDTH))?;

        Ok(Self { text })
    }

    /// The rendered report text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the report, yielding its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Report({} bytes)", self.text.len())
    }
}
