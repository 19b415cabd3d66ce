//! Cursor motions.
//!
//! Motions are pure: they compute the next logical position from the current
//! one and the document. Scrolling and physical cursor placement happen
//! afterwards, once per key, in the viewport reconcile step.

use super::EditContext;
use core_state::{CursorPosition, Mode};
use core_text::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
}

/// How far right the cursor may go on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnReach {
    /// Command mode: rests on the last character.
    LastChar,
    /// Insert mode: may sit just past the last character.
    PastEnd,
}

impl ColumnReach {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Insert => ColumnReach::PastEnd,
            Mode::Command | Mode::Ex => ColumnReach::LastChar,
        }
    }
}

/// Rightmost column allowed on `line`.
pub fn max_column(doc: &dyn Document, line: usize, reach: ColumnReach) -> usize {
    let len = doc.line_length(line);
    match reach {
        ColumnReach::PastEnd => len,
        ColumnReach::LastChar => len.saturating_sub(1),
    }
}

impl Motion {
    /// Vertical motions select whole lines and can complete an operator.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Motion::Up | Motion::Down | Motion::PageUp | Motion::PageDown
        )
    }

    /// Position after one application of the motion. `page` is the PageUp/PageDown
    /// distance. Never leaves the document and never crosses lines horizontally.
    pub fn apply(
        self,
        from: CursorPosition,
        doc: &dyn Document,
        page: usize,
        reach: ColumnReach,
    ) -> CursorPosition {
        let last_line = doc.line_count().saturating_sub(1);
        let vertical = |line: usize| {
            let line = line.min(last_line);
            CursorPosition::new(line, from.column.min(max_column(doc, line, reach)))
        };
        match self {
            Motion::Left => CursorPosition::new(from.line, from.column.saturating_sub(1)),
            Motion::Right => CursorPosition::new(
                from.line,
                (from.column + 1).min(max_column(doc, from.line, reach)),
            ),
            Motion::Up => vertical(from.line.saturating_sub(1)),
            Motion::Down => vertical(from.line.saturating_add(1)),
            Motion::PageUp => vertical(from.line.saturating_sub(page)),
            Motion::PageDown => vertical(from.line.saturating_add(page)),
            Motion::LineStart => CursorPosition::new(from.line, 0),
            Motion::LineEnd => CursorPosition::new(from.line, max_column(doc, from.line, reach)),
        }
    }
}

/// Repetition stopped at a buffer edge.
struct Blocked;

/// Apply `motion` once per pending repetition, stopping early at a buffer edge.
pub(crate) fn run_motion(ctx: &mut EditContext<'_>, motion: Motion) {
    let page = ctx.page_size();
    let reach = ColumnReach::for_mode(ctx.state.mode);
    let doc: &dyn Document = &*ctx.doc;
    let state = &mut *ctx.state;
    let cursor = &mut state.cursor;
    let _ = state.accumulator.run(|_| {
        let next = motion.apply(*cursor, doc, page, reach);
        if next == *cursor {
            return Err(Blocked);
        }
        *cursor = next;
        Ok(())
    });
    tracing::trace!(
        target: "actions.dispatch",
        ?motion,
        line = state.cursor.line,
        column = state.cursor.column,
        "motion"
    );
}
