//! Terminal screen that diffs an in-memory grid onto a crossterm writer.
//!
//! Drawing calls only touch the grid. `flush` compares each row with the row
//! last emitted and rewrites changed rows in full, grouping runs of cells that
//! share attributes into one `Print`.

use crate::grid::{Cell, Grid, GridScreen};
use crate::{Attr, Screen};
use anyhow::Result;
use crossterm::{
    cursor::{MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Stdout, Write, stdout};

pub struct CrosstermScreen<W: Write = Stdout> {
    inner: GridScreen,
    shown: Option<Grid>,
    out: W,
}

impl CrosstermScreen<Stdout> {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_writer(cols, rows, stdout())
    }
}

impl<W: Write> CrosstermScreen<W> {
    pub fn with_writer(cols: u16, rows: u16, out: W) -> Self {
        Self {
            inner: GridScreen::new(cols, rows),
            shown: None,
            out,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn queue_style(&mut self, attr: Attr) -> Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        if attr.contains(Attr::STANDOUT) {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        if attr.contains(Attr::BOLD) {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if attr.contains(Attr::FILLER) {
            queue!(self.out, SetForegroundColor(Color::Blue))?;
        } else if attr.contains(Attr::ERROR) {
            queue!(self.out, SetForegroundColor(Color::Red))?;
        } else if attr.contains(Attr::WARNING) {
            queue!(self.out, SetForegroundColor(Color::Yellow))?;
        }
        Ok(())
    }

    fn queue_row(&mut self, row: u16, cells: &[Cell]) -> Result<()> {
        queue!(self.out, MoveTo(0, row))?;
        let mut run = String::new();
        let mut run_attr = Attr::empty();
        self.queue_style(run_attr)?;
        for cell in cells {
            if cell.is_tail() {
                continue;
            }
            if cell.attr != run_attr {
                if !run.is_empty() {
                    queue!(self.out, Print(std::mem::take(&mut run)))?;
                }
                run_attr = cell.attr;
                self.queue_style(run_attr)?;
            }
            run.push(cell.ch);
        }
        if !run.is_empty() {
            queue!(self.out, Print(run))?;
        }
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Screen for CrosstermScreen<W> {
    fn cursor(&self) -> (u16, u16) {
        self.inner.cursor()
    }

    fn set_cursor(&mut self, row: u16, col: u16) {
        self.inner.set_cursor(row, col);
    }

    fn bounds(&self) -> (u16, u16) {
        self.inner.bounds()
    }

    fn scroll_region_rows(&mut self, top: u16, bottom: u16, delta: i32) {
        self.inner.scroll_region_rows(top, bottom, delta);
    }

    fn write_text(&mut self, row: u16, col: u16, text: &str) {
        self.inner.write_text(row, col, text);
    }

    fn clear_to_end_of_line(&mut self) {
        self.inner.clear_to_end_of_line();
    }

    fn attr_on(&mut self, attr: Attr) {
        self.inner.attr_on(attr);
    }

    fn attr_off(&mut self, attr: Attr) {
        self.inner.attr_off(attr);
    }

    fn flush(&mut self) -> Result<()> {
        let current = self.inner.grid().clone();
        let full = self.shown.is_none();
        if full {
            queue!(self.out, Clear(ClearType::All))?;
        }
        let mut rows_written = 0usize;
        for row in 0..current.rows() {
            let changed = match &self.shown {
                Some(prev) => prev.row(row) != current.row(row),
                None => true,
            };
            if changed {
                self.queue_row(row, current.row(row))?;
                rows_written += 1;
            }
        }
        let (rows, cols) = self.inner.bounds();
        let (r, c) = self.inner.cursor();
        queue!(
            self.out,
            MoveTo(c.min(cols.saturating_sub(1)), r.min(rows.saturating_sub(1))),
            Show
        )?;
        self.out.flush()?;
        tracing::trace!(target: "terminal.flush", full, rows_written, "flush");
        self.shown = Some(current);
        Ok(())
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.inner.resize(cols, rows);
        self.shown = None;
    }

    fn force_full_redraw(&mut self) {
        self.shown = None;
    }
}
