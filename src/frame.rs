//! Stack-frame records and the fixed-width frame formatter.
//!
//! A [`Frame`] is a read-only snapshot of one call: source file, line,
//! enclosing function, and nearby source text. Its `Display` impl is the
//! frame formatter: a `line <N> in <fn>:` heading followed by the
//! whitespace-normalized context filled to a fixed column width. The
//! formatter is pure and byte-for-byte reproducible, so report output can
//! be golden-tested.

use core::fmt;

/// Columns of content per body line, excluding the hanging indent.
pub(crate) const CONTENT_WIDTH: usize = 66;

/// Hanging indent applied to every body line.
pub(crate) const INDENT: &str = "    ";

/// One stack entry: where a call was, and what the source looked like.
///
/// No identity beyond its fields. Produced either by
/// [`BacktraceInspector`](crate::BacktraceInspector) or synthetically in
/// tests.
///
/// ## Example
///
/// ```rust
/// use faultline::Frame;
///
/// let frame = Frame::new("src/db.rs", 42, "find_user")
///     .with_context(["let row = query_one(id)?;"]);
/// assert_eq!(
///     frame.to_string(),
///     "line 42 in find_user:\n    let row = query_one(id)?;"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Source file path as reported by debug info.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// Bare name of the enclosing function or method.
    pub function: String,
    /// Source lines around the call site; empty when unavailable.
    pub context: Vec<String>,
}

impl Frame {
    /// Create a frame with no source context.
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
            context: Vec::new(),
        }
    }

    /// Attach source context lines.
    pub fn with_context<I, S>(mut self, context: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = context.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} in {}:", self.line, self.function)?;
        let joined = self.context.join(" ");
        let mut body = String::new();
        fill(&joined, CONTENT_WIDTH, INDENT, &mut body);
        if !body.is_empty() {
            write!(f, "\n{body}")?;
        }
        Ok(())
    }
}

/// Greedy word fill: collapse whitespace, break at `width` content columns,
/// prefix every produced line with `indent`.
///
/// A word longer than `width` occupies a line of its own rather than being
/// split. Empty or all-whitespace input produces no output at all.
pub(crate) fn fill(text: &str, width: usize, indent: &str, out: &mut String) {
    let mut column = 0usize;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if column == 0 {
            out.push_str(indent);
            out.push_str(word);
            column = len;
        } else if column + 1 + len <= width {
            out.push(' ');
            out.push_str(word);
            column += 1 + len;
        } else {
            out.push('\n');
            out.push_str(indent);
            out.push_str(word);
            column = len;
        }
    }
}
