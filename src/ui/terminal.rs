// Raw-mode terminal guard. Frames are drawn inline: each draw moves back to
// the first line of the previous frame and clears downwards, so the final
// frame stays in the scrollback after the program exits.

use crossterm::cursor::{Hide, MoveToColumn, MoveToPreviousLine, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};

pub struct Terminal {
    out: Stdout,
    drawn_lines: u16,
}

impl Terminal {
    /// Switch stdout to raw mode with bracketed paste enabled. Restored on drop.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, Hide, EnableBracketedPaste) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out, drawn_lines: 0 })
    }

    /// Replace the previous frame with `frame` (lines separated by `\n`).
    pub fn draw(&mut self, frame: &str) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0))?;
        if self.drawn_lines > 1 {
            queue!(self.out, MoveToPreviousLine(self.drawn_lines - 1))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;

        let mut lines = 0u16;
        for (i, line) in frame.lines().enumerate() {
            if i > 0 {
                queue!(self.out, Print("\r\n"))?;
            }
            queue!(self.out, Print(line))?;
            lines = lines.saturating_add(1);
        }
        self.drawn_lines = lines;
        self.out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, Print("\r\n"), DisableBracketedPaste, Show);
        let _ = terminal::disable_raw_mode();
    }
}
