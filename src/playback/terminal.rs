//! Terminal size queries, clearing and frame output.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::ascii::TerminalSize;

/// Where rendered frames go.
pub trait Terminal {
    /// Current size in cells, 80x24 when it cannot be determined.
    fn size(&self) -> TerminalSize;
    /// Erase the display and home the cursor.
    fn clear(&mut self) -> io::Result<()>;
    /// Write one frame followed by a newline.
    fn present(&mut self, frame: &str) -> io::Result<()>;
}

/// Query the controlling terminal, falling back to 80x24.
pub fn terminal_size() -> TerminalSize {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => TerminalSize { cols, rows },
        _ => TerminalSize::default(),
    }
}

/// [`Terminal`] over any writer, sized by crossterm.
pub struct CrosstermTerminal<W: Write> {
    out: W,
}

impl CrosstermTerminal<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Terminal for CrosstermTerminal<W> {
    fn size(&self) -> TerminalSize {
        terminal_size()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()
    }

    fn present(&mut self, frame: &str) -> io::Result<()> {
        self.out.write_all(frame.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_appends_newline() {
        let mut term = CrosstermTerminal::new(Vec::new());
        term.present("ab").unwrap();
        term.present("cd").unwrap();
        assert_eq!(term.into_inner(), b"ab\ncd\n");
    }

    #[test]
    fn test_clear_emits_erase_and_home() {
        let mut term = CrosstermTerminal::new(Vec::new());
        term.clear().unwrap();
        let out = String::from_utf8(term.into_inner()).unwrap();
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("\x1b[1;1H"));
    }

    #[test]
    fn test_terminal_size_never_zero() {
        let size = terminal_size();
        assert!(size.cols > 0);
        assert!(size.rows > 0);
    }
}
