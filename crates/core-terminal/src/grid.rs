//! In-memory cell grid and the headless [`GridScreen`].

use crate::{Attr, Screen, char_width};
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub attr: Attr,
}

impl Cell {
    /// Second column of a double-width character. Never printed.
    pub const fn tail(attr: Attr) -> Self {
        Self { ch: '\0', attr }
    }

    pub fn is_tail(&self) -> bool {
        self.ch == '\0'
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attr: Attr::empty(),
        }
    }
}

/// Fixed size matrix of cells stored row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row as usize * self.cols as usize + col as usize)
    }

    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, row: u16, col: u16, cell: Cell) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = cell;
        }
    }

    /// Store `cell` and blank the other half of any wide character it lands on.
    pub fn put(&mut self, row: u16, col: u16, cell: Cell) {
        if col > 0 && self.cell(row, col).is_some_and(Cell::is_tail) {
            self.set(row, col - 1, Cell::default());
        }
        self.set(row, col, cell);
        let next = col.saturating_add(1);
        if self.cell(row, next).is_some_and(Cell::is_tail) {
            self.set(row, next, Cell::default());
        }
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Row contents with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        let s: String = self
            .row(row)
            .iter()
            .filter(|c| !c.is_tail())
            .map(|c| c.ch)
            .collect();
        s.trim_end().to_string()
    }

    pub fn clear_row_from(&mut self, row: u16, col: u16) {
        if row >= self.rows {
            return;
        }
        if col > 0 && self.cell(row, col).is_some_and(Cell::is_tail) {
            self.set(row, col - 1, Cell::default());
        }
        for c in col..self.cols {
            self.set(row, c, Cell::default());
        }
    }

    /// Move rows `top..=bottom` by `delta` (positive = up). Uncovered rows are blanked.
    pub fn shift_rows(&mut self, top: u16, bottom: u16, delta: i32) {
        if self.rows == 0 || top > bottom || delta == 0 {
            return;
        }
        let bottom = bottom.min(self.rows - 1);
        let (top, bottom) = (i32::from(top), i32::from(bottom));
        let width = self.cols as usize;
        let copy_row = |grid: &mut Grid, from: i32, to: i32| {
            let src = from as usize * width;
            let dst = to as usize * width;
            grid.cells.copy_within(src..src + width, dst);
        };
        if delta > 0 {
            for to in top..=bottom {
                let from = to + delta;
                if from <= bottom {
                    copy_row(self, from, to);
                } else {
                    self.clear_row_from(to as u16, 0);
                }
            }
        } else {
            for to in (top..=bottom).rev() {
                let from = to + delta;
                if from >= top {
                    copy_row(self, from, to);
                } else {
                    self.clear_row_from(to as u16, 0);
                }
            }
        }
    }
}

/// Headless screen: all drawing lands in a [`Grid`]. `flush` only counts.
#[derive(Debug, Clone)]
pub struct GridScreen {
    grid: Grid,
    cursor: (u16, u16),
    attr: Attr,
    flushes: usize,
    full_redraws: usize,
}

impl GridScreen {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            grid: Grid::new(cols, rows),
            cursor: (0, 0),
            attr: Attr::empty(),
            flushes: 0,
            full_redraws: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn row_text(&self, row: u16) -> String {
        self.grid.row_text(row)
    }

    /// All rows, trailing blanks trimmed.
    pub fn lines(&self) -> Vec<String> {
        (0..self.grid.rows()).map(|r| self.grid.row_text(r)).collect()
    }

    pub fn attr_at(&self, row: u16, col: u16) -> Attr {
        self.grid.cell(row, col).map(|c| c.attr).unwrap_or_default()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn full_redraw_requests(&self) -> usize {
        self.full_redraws
    }

    pub fn active_attr(&self) -> Attr {
        self.attr
    }
}

fn display_char(c: char) -> char {
    if c.is_control() { ' ' } else { c }
}

impl Screen for GridScreen {
    fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    fn set_cursor(&mut self, row: u16, col: u16) {
        self.cursor = (row, col);
    }

    fn bounds(&self) -> (u16, u16) {
        (self.grid.rows(), self.grid.cols())
    }

    fn scroll_region_rows(&mut self, top: u16, bottom: u16, delta: i32) {
        self.grid.shift_rows(top, bottom, delta);
    }

    fn write_text(&mut self, row: u16, col: u16, text: &str) {
        let mut c = col;
        for ch in text.chars() {
            let width = char_width(ch) as u16;
            if width == 0 {
                continue;
            }
            if u32::from(c) + u32::from(width) > u32::from(self.grid.cols()) {
                break;
            }
            let cell = Cell {
                ch: display_char(ch),
                attr: self.attr,
            };
            self.grid.put(row, c, cell);
            for tail in 1..width {
                self.grid.put(row, c + tail, Cell::tail(self.attr));
            }
            c += width;
        }
        self.cursor = (row, c);
    }

    fn clear_to_end_of_line(&mut self) {
        let (row, col) = self.cursor;
        if col > 0 && self.grid.cell(row, col).is_some_and(Cell::is_tail) {
            self.grid.set(row, col - 1, Cell::default());
        }
        for c in col..self.grid.cols() {
            self.grid.set(
                row,
                c,
                Cell {
                    ch: ' ',
                    attr: self.attr,
                },
            );
        }
    }

    fn attr_on(&mut self, attr: Attr) {
        self.attr |= attr;
    }

    fn attr_off(&mut self, attr: Attr) {
        self.attr &= !attr;
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.grid = Grid::new(cols, rows);
        let (r, c) = self.cursor;
        self.cursor = (r.min(rows.saturating_sub(1)), c.min(cols.saturating_sub(1)));
    }

    fn force_full_redraw(&mut self) {
        self.full_redraws += 1;
    }
}
