//! The interactive viewer collaborator.
//!
//! The guard hands a viewer one opaque multi-line text blob and expects it
//! to display the text read-only, scrollable, and to *eventually* return
//! control. [`ConsoleViewer`] does this in the terminal: the report is
//! shown in the alternate screen, arrow keys scroll, and a yes/no
//! "still viewing?" confirmation fires at escalating intervals, starting
//! at 5 seconds (doubling below 20 seconds, then growing by 5), until a
//! cumulative ceiling of 35 seconds closes the display unconditionally.
//! A confirmation left unanswered counts as "no", so the viewer can never
//! hold the process hostage.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};

/// Delay before the first confirmation prompt.
const FIRST_PROMPT: Duration = Duration::from_secs(5);

/// Cumulative viewing time after which the display closes unconditionally.
const CEILING: Duration = Duration::from_secs(35);

/// Granularity of the input poll while waiting.
const POLL_STEP: Duration = Duration::from_millis(250);

/// Something that can display one finished report.
pub trait Viewer: Send + Sync {
    /// Display `text` and return once the user (or a timeout) is done with it.
    fn show(&self, text: &str) -> io::Result<()>;
}

/// Terminal pager with an auto-expiring confirmation timer.
#[derive(Debug, Clone, Default)]
pub struct ConsoleViewer {
    _private: (),
}

impl ConsoleViewer {
    /// A viewer over the process's terminal.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Viewer for ConsoleViewer {
    fn show(&self, text: &str) -> io::Result<()> {
        let lines: Vec<&str> = text.lines().collect();
        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        let result = pager_loop(&mut out, &lines);
        // Restore the terminal even when the pager failed mid-draw.
        let restored = execute!(out, Show, LeaveAlternateScreen).and(disable_raw_mode());
        result.and(restored)
    }
}

/// Next confirmation interval: double below 20 s, then step by 5 s.
fn next_interval(current: Duration) -> Duration {
    if current < Duration::from_secs(20) {
        current * 2
    } else {
        current + Duration::from_secs(5)
    }
}

fn pager_loop(out: &mut io::Stdout, lines: &[&str]) -> io::Result<()> {
    let mut offset = 0usize;
    let mut shown = Duration::ZERO;
    let mut interval = FIRST_PROMPT;

    loop {
        match watch(out, lines, &mut offset, interval)? {
            Watched::Quit => return Ok(()),
            Watched::Expired => {}
        }
        shown += interval;
        if shown >= CEILING {
            return Ok(());
        }
        interval = next_interval(interval);
        if shown + interval > CEILING {
            interval = CEILING - shown;
        }
        if !confirm(out, lines, offset, interval)? {
            return Ok(());
        }
    }
}

enum Watched {
    /// The user closed the display.
    Quit,
    /// The interval elapsed without a close.
    Expired,
}

/// Display and scroll for up to `interval`, handling resize and close keys.
fn watch(
    out: &mut io::Stdout,
    lines: &[&str],
    offset: &mut usize,
    interval: Duration,
) -> io::Result<Watched> {
    let deadline = Instant::now() + interval;
    draw(out, lines, *offset, None)?;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(Watched::Expired);
        }
        if !event::poll((deadline - now).min(POLL_STEP))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(Watched::Quit),
                KeyCode::Up => {
                    *offset = offset.saturating_sub(1);
                    draw(out, lines, *offset, None)?;
                }
                KeyCode::Down => {
                    *offset = (*offset + 1).min(max_offset(lines)?);
                    draw(out, lines, *offset, None)?;
                }
                KeyCode::PageUp => {
                    *offset = offset.saturating_sub(page(lines)?);
                    draw(out, lines, *offset, None)?;
                }
                KeyCode::PageDown => {
                    *offset = (*offset + page(lines)?).min(max_offset(lines)?);
                    draw(out, lines, *offset, None)?;
                }
                _ => {}
            },
            Event::Resize(..) => draw(out, lines, *offset, None)?,
            _ => {}
        }
    }
}

/// Ask whether to keep viewing for another `interval`. `y` continues;
/// `n`, `q`, `Esc`, or letting the question itself expire declines.
fn confirm(
    out: &mut io::Stdout,
    lines: &[&str],
    offset: usize,
    interval: Duration,
) -> io::Result<bool> {
    let prompt = format!(
        "Still viewing for another {} seconds? [y/n]",
        interval.as_secs()
    );
    draw(out, lines, offset, Some(&prompt))?;
    let deadline = Instant::now() + interval;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        if !event::poll((deadline - now).min(POLL_STEP))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => {
                    return Ok(false);
                }
                _ => {}
            },
            _ => {}
        }
    }
}

/// Rows available for report text, below which sits the status line.
fn body_rows() -> io::Result<usize> {
    let (_, rows) = terminal::size()?;
    Ok(rows.saturating_sub(1) as usize)
}

fn page(lines: &[&str]) -> io::Result<usize> {
    Ok(body_rows()?.max(1).min(lines.len()))
}

fn max_offset(lines: &[&str]) -> io::Result<usize> {
    Ok(lines.len().saturating_sub(body_rows()?))
}

fn draw(out: &mut io::Stdout, lines: &[&str], offset: usize, status: Option<&str>) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let body = rows.saturating_sub(1) as usize;
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().skip(offset).take(body).enumerate() {
        let clipped: String = line.chars().take(cols as usize).collect();
        queue!(out, MoveTo(0, row as u16), Print(clipped))?;
    }
    let status = status.unwrap_or("Up/Down scroll - q closes");
    let clipped: String = status.chars().take(cols as usize).collect();
    queue!(out, MoveTo(0, rows.saturating_sub(1)), Print(clipped))?;
    out.flush()
}
