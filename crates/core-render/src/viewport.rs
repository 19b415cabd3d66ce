//! Logical line <-> screen row mapping for the buffer window.
//!
//! Window row `r` always shows document line `viewport.top_line + r`; rows
//! past the end of the document show [`FILLER_GLYPH`]. All scrolling and
//! physical cursor placement goes through [`ViewportCoordinator`].

use core_state::Viewport;
use core_terminal::{Attr, Screen, char_width};
use core_text::Document;
use tracing::trace;

pub const FILLER_GLYPH: &str = "~";

/// Borrowed view over the viewport, the document and the screen for one reconcile pass.
pub struct ViewportCoordinator<'a> {
    viewport: &'a mut Viewport,
    doc: &'a dyn Document,
    screen: &'a mut dyn Screen,
}

impl<'a> ViewportCoordinator<'a> {
    pub fn new(viewport: &'a mut Viewport, doc: &'a dyn Document, screen: &'a mut dyn Screen) -> Self {
        Self {
            viewport,
            doc,
            screen,
        }
    }

    fn last_row(&self) -> u16 {
        self.viewport.height - 1
    }

    /// Shift the rows `row_top..=row_bottom` by `delta` lines and repaint them. Positive
    /// `delta` scrolls content up (later lines move to earlier rows).
    ///
    /// A region starting at row 0 moves the viewport itself: the delta is clamped so the
    /// top line stays within `0..line_count`. A region starting lower only shifts rows
    /// (used after the document gained or lost lines below the cursor). Returns the
    /// applied delta; zero means nothing was drawn.
    pub fn scroll_region(&mut self, delta: isize, row_top: u16, row_bottom: u16) -> isize {
        let row_bottom = row_bottom.min(self.last_row());
        if row_top > row_bottom {
            return 0;
        }
        let mut applied = delta;
        if row_top == 0 {
            let top = self.viewport.top_line as isize;
            let max_top = (self.doc.line_count() as isize - 1).max(0);
            if top + applied < 0 {
                applied = -top;
            }
            if top + applied > max_top {
                applied = max_top - top;
            }
            if applied == 0 {
                return 0;
            }
            self.viewport.top_line = (top + applied) as usize;
        } else if applied == 0 {
            return 0;
        }
        trace!(
            target: "render.viewport",
            requested = delta,
            applied,
            row_top,
            row_bottom,
            top_line = self.viewport.top_line,
            "scroll_region"
        );
        let shift = applied.clamp(i32::MIN as isize, i32::MAX as isize) as i32;
        self.screen.scroll_region_rows(row_top, row_bottom, shift);
        self.repaint_rows(row_top, row_bottom);
        applied
    }

    /// Scroll as needed so `line` is visible, then place the physical cursor. Returns the
    /// screen position used.
    pub fn move_to(&mut self, line: usize, column: usize) -> (u16, u16) {
        debug_assert!(
            line < self.doc.line_count(),
            "move_to line {line} past document end"
        );
        let height = self.viewport.height as isize;
        let row = line as isize - self.viewport.top_line as isize;
        if row < 0 {
            self.scroll_region(row, 0, self.last_row());
        } else if row >= height {
            self.scroll_region(row - height + 1, 0, self.last_row());
        }
        self.place_cursor(line, column)
    }

    /// Place the physical cursor for `(line, column)` without scrolling. The column is
    /// clamped to the line length, then mapped to the screen cell where that character
    /// starts, which differs once the line holds double-width characters.
    pub fn place_cursor(&mut self, line: usize, column: usize) -> (u16, u16) {
        let row = self.viewport.row_of(line).unwrap_or_else(|| {
            debug_assert!(false, "place_cursor on invisible line {line}");
            self.last_row()
        });
        let column = column.min(self.doc.line_length(line));
        let cells: usize = self.doc.line(line).chars().take(column).map(char_width).sum();
        let col = cells.min(usize::from(self.viewport.width - 1)) as u16;
        self.screen.set_cursor(row, col);
        (row, col)
    }

    /// Repaint one window row from the document (or the filler past the end).
    pub fn paint_row(&mut self, row: u16) {
        let line = self.viewport.line_at(row);
        if line < self.doc.line_count() {
            let text = self.doc.line(line);
            self.screen.write_text(row, 0, &text);
            self.screen.clear_to_end_of_line();
        } else {
            self.screen.attr_on(Attr::FILLER);
            self.screen.write_text(row, 0, FILLER_GLYPH);
            self.screen.attr_off(Attr::FILLER);
            self.screen.clear_to_end_of_line();
        }
    }

    pub fn repaint_rows(&mut self, from: u16, to: u16) {
        let to = to.min(self.last_row());
        for row in from..=to {
            self.paint_row(row);
        }
    }

    pub fn repaint_all(&mut self) {
        let last = self.last_row();
        self.repaint_rows(0, last);
    }

    /// Repaint from the row showing `line` to the bottom of the window. Lines above the
    /// window repaint everything; lines below it repaint nothing.
    pub fn repaint_from_line(&mut self, line: usize) {
        if line < self.viewport.top_line {
            self.repaint_all();
        } else if let Some(row) = self.viewport.row_of(line) {
            let last = self.last_row();
            self.repaint_rows(row, last);
        }
    }

    /// Adopt a new screen size. Screen contents are discarded; follow with `move_to` and
    /// `repaint_all`.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen.resize(cols, rows);
        self.screen.force_full_redraw();
        let fresh = Viewport::for_screen(cols, rows);
        self.viewport.height = fresh.height;
        self.viewport.width = fresh.width;
        let last_top = self.doc.line_count().saturating_sub(1);
        self.viewport.top_line = self.viewport.top_line.min(last_top);
        trace!(
            target: "render.viewport",
            cols,
            rows,
            height = self.viewport.height,
            "resize"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::GridScreen;
    use core_text::Buffer;

    fn numbered(n: usize) -> Buffer {
        let text = (0..n).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        Buffer::from_text(&text)
    }

    fn setup(lines: usize, height: u16) -> (Viewport, Buffer, GridScreen) {
        let vp = Viewport {
            top_line: 0,
            height,
            width: 20,
        };
        (vp, numbered(lines), GridScreen::new(20, height + 2))
    }

    #[test]
    fn repaint_all_uses_filler_past_end() {
        let (mut vp, doc, mut screen) = setup(2, 4);
        ViewportCoordinator::new(&mut vp, &doc, &mut screen).repaint_all();
        assert_eq!(&screen.lines()[..4], &["line0", "line1", "~", "~"]);
        assert_eq!(screen.attr_at(2, 0), Attr::FILLER);
        assert_eq!(screen.attr_at(0, 0), Attr::empty());
    }

    #[test]
    fn scroll_up_is_clamped_at_buffer_start() {
        let (mut vp, doc, mut screen) = setup(10, 4);
        vp.top_line = 2;
        let applied = ViewportCoordinator::new(&mut vp, &doc, &mut screen).scroll_region(-5, 0, 3);
        assert_eq!(applied, -2);
        assert_eq!(vp.top_line, 0);
        assert_eq!(screen.row_text(0), "line0");
    }

    #[test]
    fn zero_scroll_draws_nothing() {
        let (mut vp, doc, mut screen) = setup(10, 4);
        let applied = ViewportCoordinator::new(&mut vp, &doc, &mut screen).scroll_region(-1, 0, 3);
        assert_eq!(applied, 0);
        assert!(screen.lines().iter().all(|l| l.is_empty()));
    }

    #[test]
    fn scroll_down_is_clamped_at_last_line() {
        let (mut vp, doc, mut screen) = setup(5, 4);
        let applied = ViewportCoordinator::new(&mut vp, &doc, &mut screen).scroll_region(10, 0, 3);
        assert_eq!(applied, 4);
        assert_eq!(vp.top_line, 4);
        assert_eq!(&screen.lines()[..4], &["line4", "~", "~", "~"]);
    }

    #[test]
    fn move_below_window_scrolls_by_overflow() {
        let (mut vp, doc, mut screen) = setup(20, 4);
        let pos = ViewportCoordinator::new(&mut vp, &doc, &mut screen).move_to(6, 2);
        assert_eq!(vp.top_line, 3);
        assert_eq!(pos, (3, 2));
        assert_eq!(screen.cursor(), (3, 2));
        assert_eq!(&screen.lines()[..4], &["line3", "line4", "line5", "line6"]);
    }

    #[test]
    fn move_above_window_scrolls_down() {
        let (mut vp, doc, mut screen) = setup(20, 4);
        vp.top_line = 10;
        let pos = ViewportCoordinator::new(&mut vp, &doc, &mut screen).move_to(8, 0);
        assert_eq!(vp.top_line, 8);
        assert_eq!(pos, (0, 0));
    }

    #[test]
    fn move_within_window_does_not_scroll() {
        let (mut vp, doc, mut screen) = setup(20, 4);
        let pos = ViewportCoordinator::new(&mut vp, &doc, &mut screen).move_to(2, 100);
        assert_eq!(vp.top_line, 0);
        assert_eq!(pos, (2, 5), "column clamped to line length");
    }

    #[test]
    fn column_is_clamped_to_window_width() {
        let mut vp = Viewport {
            top_line: 0,
            height: 2,
            width: 4,
        };
        let doc = Buffer::from_text("abcdefgh");
        let mut screen = GridScreen::new(4, 4);
        let pos = ViewportCoordinator::new(&mut vp, &doc, &mut screen).move_to(0, 7);
        assert_eq!(pos, (0, 3));
    }

    #[test]
    fn cursor_column_counts_screen_cells() {
        let (mut vp, _, mut screen) = setup(0, 2);
        let doc = Buffer::from_text("中文ab\na\tb");
        let mut coord = ViewportCoordinator::new(&mut vp, &doc, &mut screen);
        coord.repaint_all();
        assert_eq!(coord.place_cursor(0, 1), (0, 2));
        assert_eq!(coord.place_cursor(0, 2), (0, 4));
        assert_eq!(coord.place_cursor(0, 9), (0, 5));
        assert_eq!(coord.place_cursor(1, 2), (1, 2));
        drop(coord);
        assert_eq!(screen.row_text(0), "中文ab");
    }

    #[test]
    fn partial_region_shift_keeps_top_line() {
        let (mut vp, mut doc, mut screen) = setup(6, 4);
        ViewportCoordinator::new(&mut vp, &doc, &mut screen).repaint_all();
        doc.add_line(1, "new");
        let applied = ViewportCoordinator::new(&mut vp, &doc, &mut screen).scroll_region(-1, 1, 3);
        assert_eq!(applied, -1);
        assert_eq!(vp.top_line, 0);
        assert_eq!(&screen.lines()[..4], &["line0", "new", "line1", "line2"]);
    }

    #[test]
    fn repaint_from_line_below_window_is_noop() {
        let (mut vp, doc, mut screen) = setup(20, 4);
        ViewportCoordinator::new(&mut vp, &doc, &mut screen).repaint_from_line(10);
        assert!(screen.lines().iter().all(|l| l.is_empty()));
    }

    #[test]
    fn resize_recomputes_window_and_keeps_top_in_document() {
        let (mut vp, doc, mut screen) = setup(5, 4);
        vp.top_line = 4;
        let mut vc = ViewportCoordinator::new(&mut vp, &doc, &mut screen);
        vc.resize(30, 10);
        vc.move_to(4, 0);
        vc.repaint_all();
        assert_eq!((vp.height, vp.width, vp.top_line), (8, 30, 4));
        assert_eq!(screen.bounds(), (10, 30));
        assert_eq!(screen.full_redraw_requests(), 1);
        assert_eq!(&screen.lines()[..2], &["line4", "~"]);
    }
}
