use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};

use crate::ui::theme::Theme;

/// Render requests emitted by the training engine.
pub trait Feedback {
    /// Shown once before the first line.
    fn banner(&mut self) -> io::Result<()>;
    /// The line to copy, shown before raw mode is entered.
    fn prompt(&mut self, line: &str) -> io::Result<()>;
    fn matched(&mut self, ch: char) -> io::Result<()>;
    fn mismatched(&mut self, expected: char, actual: char) -> io::Result<()>;
    /// Closes the feedback row, after raw mode has been left.
    fn end_line(&mut self) -> io::Result<()>;
}

/// Colored feedback written straight to a terminal.
pub struct TerminalFeedback<W: Write> {
    out: W,
    theme: Theme,
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Feedback for TerminalFeedback<W> {
    fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "Copy each line or use Ctrl+c or ESC to quit.")?;
        writeln!(self.out, "{}", "—".repeat(44))?;
        self.out.flush()
    }

    fn prompt(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn matched(&mut self, _ch: char) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(self.theme.match_color()),
            Print(&self.theme.match_glyph),
            ResetColor
        )?;
        self.out.flush()
    }

    fn mismatched(&mut self, expected: char, actual: char) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            Print(actual),
            Print(' '),
            SetForegroundColor(self.theme.mismatch_color()),
            Print(&self.theme.mismatch_glyph),
            ResetColor,
            Print(' '),
            Print(expected),
            SetAttribute(Attribute::Reset)
        )?;
        self.out.flush()
    }

    fn end_line(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}
