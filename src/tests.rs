//! Unit tests for faultline.
//!
//! These tests live in `src/` to retain access to `pub(crate)` items like
//! `fill` and the report layout constants. End-to-end guard behavior is
//! covered by the integration suites under `tests/`.

use core::fmt;

use crate::frame::{CONTENT_WIDTH, Frame, INDENT, fill};
use crate::mode::Mode;
use crate::raised::{Raised, raise, short_type_name};
use crate::report::{FailureSummary, Report, RULE_WIDTH};
use crate::{Error, Outcome};

#[derive(Debug, PartialEq, Eq)]
struct ValueError(String);

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValueError {}

// ============================================================================
// Frame formatter
// ============================================================================

#[test]
fn fill_is_empty_for_blank_input() {
    let mut out = String::new();
    fill("", CONTENT_WIDTH, INDENT, &mut out);
    assert!(out.is_empty());
    fill("   \t  ", CONTENT_WIDTH, INDENT, &mut out);
    assert!(out.is_empty());
}

#[test]
fn fill_collapses_whitespace_and_indents() {
    let mut out = String::new();
    fill("let  x =\n   compute();", CONTENT_WIDTH, INDENT, &mut out);
    assert_eq!(out, "    let x = compute();");
}

#[test]
fn fill_breaks_at_content_width_with_hanging_indent() {
    // 10 words of 6 chars: 6*10 + 9 spaces = 69 > 66, so the last word wraps.
    let text = vec!["abcdef"; 10].join(" ");
    let mut out = String::new();
    fill(&text, CONTENT_WIDTH, INDENT, &mut out);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("    {}", vec!["abcdef"; 9].join(" ")));
    assert_eq!(lines[1], "    abcdef");
}

#[test]
fn fill_puts_oversized_words_on_their_own_line() {
    let long = "x".repeat(80);
    let mut out = String::new();
    fill(&format!("a {long} b"), CONTENT_WIDTH, INDENT, &mut out);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["    a".to_string(), format!("    {long}"), "    b".to_string()]);
}

#[test]
fn frame_renders_heading_and_body() {
    let frame = Frame::new("src/db.rs", 42, "find_user").with_context(["let row = query_one(id)?;"]);
    assert_eq!(
        frame.to_string(),
        "line 42 in find_user:\n    let row = query_one(id)?;"
    );
}

#[test]
fn frame_without_context_renders_heading_only() {
    let frame = Frame::new("src/db.rs", 7, "connect");
    assert_eq!(frame.to_string(), "line 7 in connect:");
}

#[test]
fn frame_joins_multiple_context_lines() {
    let frame = Frame::new("a.rs", 3, "f").with_context(["foo(", "    bar,", ")"]);
    assert_eq!(frame.to_string(), "line 3 in f:\n    foo( bar, )");
}

#[test]
fn frame_formatting_is_idempotent() {
    let frame = Frame::new("src/db.rs", 42, "find_user")
        .with_context([vec!["word"; 40].join(" ")]);
    assert_eq!(frame.to_string(), frame.to_string());
}

// ============================================================================
// Mode boundary
// ============================================================================

#[test]
fn mode_accepts_exactly_three_raw_values() {
    assert_eq!(Mode::from_raw(-1).ok(), Some(Mode::Propagate));
    assert_eq!(Mode::from_raw(0).ok(), Some(Mode::Print));
    assert_eq!(Mode::from_raw(1).ok(), Some(Mode::Interactive));
    assert!(matches!(Mode::from_raw(2), Err(Error::InvalidMode(2))));
    assert!(matches!(Mode::from_raw(-2), Err(Error::InvalidMode(-2))));
}

#[test]
fn mode_parses_integer_tokens_only() {
    assert_eq!(" 0 ".parse::<Mode>().ok(), Some(Mode::Print));
    assert!(matches!(
        "x".parse::<Mode>(),
        Err(Error::InvalidModeToken(t)) if t == "x"
    ));
    assert!(matches!("2".parse::<Mode>(), Err(Error::InvalidMode(2))));
}

#[test]
fn mode_round_trips_through_raw() {
    for mode in [Mode::Propagate, Mode::Print, Mode::Interactive] {
        assert_eq!(Mode::from_raw(mode.as_raw()).ok(), Some(mode));
    }
    assert!(Mode::Propagate.propagates());
    assert!(!Mode::Print.propagates());
}

// ============================================================================
// Report builder (synthetic frames)
// ============================================================================

fn caller_frames() -> Vec<Frame> {
    vec![
        Frame::new("src/main.rs", 8, "main").with_context(["run(&args)"]),
        Frame::new("src/app.rs", 21, "run").with_context(["load_config(path)"]),
    ]
}

#[test]
fn report_matches_golden_layout() {
    let failure = vec![Frame::new("src/config.rs", 31, "read_value").with_context(["field.parse()?"])];
    let summary = FailureSummary::new("ParseError", "invalid digit");
    let report = Report::build(&caller_frames(), &failure, &summary, "load_config")
        .expect("builder must succeed on well-formed frames");

    let banner = "<- Exception raise: ParseError ->";
    let expected = format!(
        "Filename caller: SRC/MAIN.RS\n\
         \n\
         ERROR - <load_config>:\n\
         {rule}\n\
         Start at:\n\
         \n\
         line 8 in main:\n    run(&args)\n\
         \n\
         line 21 in run:\n    load_config(path)\n\
         \n\
         {tilde}\n\
         {banner}\n\
         {tilde}\n\
         \n\
         line 31 in read_value:\n    field.parse()?\n\
         \n\
         ParseError: invalid digit\n\
         {rule}\n",
        rule = "-".repeat(RULE_WIDTH),
        tilde = "~".repeat(banner.len()),
    );
    assert_eq!(report.text(), expected);
}

#[test]
fn report_building_is_deterministic() {
    let failure = vec![Frame::new("src/config.rs", 31, "read_value")];
    let summary = FailureSummary::new("ParseError", "invalid digit");
    let first = Report::build(&caller_frames(), &failure, &summary, "load_config")
        .expect("first build");
    let second = Report::build(&caller_frames(), &failure, &summary, "load_config")
        .expect("second build");
    assert_eq!(first.text(), second.text());
}

#[test]
fn report_omits_trailing_message_when_empty() {
    let summary = FailureSummary::new("Interrupted", "");
    let report = Report::build(&caller_frames(), &[], &summary, "step")
        .expect("build with empty message");
    assert!(report.text().contains("\nInterrupted\n"));
    assert!(!report.text().contains("Interrupted:"));
}

#[test]
fn report_with_no_caller_frames_marks_origin_unknown() {
    let summary = FailureSummary::new("Boom", "x");
    let report = Report::build(&[], &[], &summary, "orphan").expect("build without callers");
    assert!(report.text().starts_with("Filename caller: <UNKNOWN>\n"));
}

#[test]
fn report_allows_empty_failure_section() {
    // A failure raised directly in the wrapped callable has no deeper frames.
    let summary = FailureSummary::new("Boom", "right here");
    let report = Report::build(&caller_frames(), &[], &summary, "direct")
        .expect("build with empty failure chain");
    let banner = "<- Exception raise: Boom ->";
    let tilde = "~".repeat(banner.len());
    let tail = report
        .text()
        .split(&tilde)
        .nth(2)
        .expect("banner present twice");
    assert!(!tail.contains("\nline "), "no frames expected, got:\n{tail}");
    assert!(tail.contains("Boom: right here"));
}

// ============================================================================
// Raised summaries and outcomes
// ============================================================================

#[test]
fn summary_uses_bare_type_name_and_display_message() {
    let raised = raise(ValueError("boom".into()));
    let summary = raised.summary();
    assert_eq!(summary.name, "ValueError");
    assert_eq!(summary.message, "boom");
}

#[test]
fn short_type_name_strips_paths_and_generics() {
    assert_eq!(short_type_name::<ValueError>(), "ValueError");
    assert_eq!(short_type_name::<Raised<ValueError>>(), "Raised");
    assert_eq!(short_type_name::<u32>(), "u32");
}

#[test]
fn raised_keeps_error_and_capture() {
    let raised = raise(ValueError("boom".into()));
    assert_eq!(raised.error(), &ValueError("boom".into()));
    assert!(raised.capture().depth() > 0);
    assert_eq!(raised.to_string(), "boom");
    assert_eq!(raised.into_inner(), ValueError("boom".into()));
}

#[test]
fn outcome_distinguishes_values_from_suppression() {
    assert_eq!(Outcome::Returned(0).returned(), Some(0));
    assert!(!Outcome::Returned(false).is_suppressed());
    assert!(Outcome::<i32>::Suppressed.is_suppressed());
    assert_eq!(Outcome::<i32>::Suppressed.returned(), None);
}
