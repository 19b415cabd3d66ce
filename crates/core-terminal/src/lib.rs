//! Screen abstraction plus crossterm terminal backend.
//!
//! The engine draws through [`Screen`], a curses-like surface addressed by
//! `(row, col)`. [`GridScreen`] keeps everything in memory (tests, headless use);
//! [`CrosstermScreen`] wraps the same grid and diffs it onto the real terminal
//! on `flush`.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;

pub mod crossterm_screen;
pub mod grid;
pub mod width;

pub use crossterm_screen::CrosstermScreen;
pub use grid::{Cell, Grid, GridScreen};
pub use width::{char_width, text_width};

bitflags::bitflags! {
    /// Display attributes carried by each cell.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attr: u8 {
        /// Reverse video status bar.
        const STANDOUT = 0b0000_0001;
        /// `~` rows past the end of the buffer.
        const FILLER   = 0b0000_0010;
        const ERROR    = 0b0000_0100;
        const WARNING  = 0b0000_1000;
        const BOLD     = 0b0001_0000;
    }
}

/// Drawing surface consumed by the engine. Rows and columns are zero based.
pub trait Screen {
    /// Current cursor `(row, col)`.
    fn cursor(&self) -> (u16, u16);
    fn set_cursor(&mut self, row: u16, col: u16);
    /// `(rows, cols)` of the whole surface.
    fn bounds(&self) -> (u16, u16);
    /// Shift rows `top..=bottom` by `delta`: positive moves content up, negative down.
    /// Rows uncovered by the shift are blanked.
    fn scroll_region_rows(&mut self, top: u16, bottom: u16, delta: i32);
    /// Write `text` starting at `(row, col)` with the active attributes, leaving the cursor
    /// after the last written cell. Text past the right edge is dropped.
    fn write_text(&mut self, row: u16, col: u16, text: &str);
    /// Blank from the cursor to the end of its row.
    fn clear_to_end_of_line(&mut self);
    fn attr_on(&mut self, attr: Attr);
    fn attr_off(&mut self, attr: Attr);
    fn flush(&mut self) -> Result<()>;
    /// New geometry; contents are discarded.
    fn resize(&mut self, cols: u16, rows: u16);
    /// Make the next flush repaint every row regardless of what was shown before.
    fn force_full_redraw(&mut self);
}

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }

    /// Current terminal `(cols, rows)`, falling back to 80x24 when unavailable.
    pub fn size() -> (u16, u16) {
        crossterm::terminal::size().unwrap_or((80, 24))
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
