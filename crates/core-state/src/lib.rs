//! Editor state: mode, cursor, viewport and the transient command state.
//!
//! Exactly one [`EditorState`] exists per session. Handlers receive it by
//! mutable reference; nothing here is global. The document and screen are not
//! owned here, so invariants that mention the document take it as a parameter.

pub mod accumulator;
pub mod ex_line;
pub mod messages;
pub mod operator;

pub use accumulator::{Accumulator, MAX_COUNT};
pub use ex_line::ExLineBuffer;
pub use messages::{Severity, StatusMessages};
pub use operator::{Operator, OperatorFlags, OperatorPendingState};

use core_text::Document;

/// Rows reserved under the buffer window: status bar and message line.
pub const STATUS_ROWS: u16 = 2;

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Navigation and operators.
    #[default]
    Command,
    /// Text entry.
    Insert,
    /// `:` command line.
    Ex,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Command => "command",
            Mode::Insert => "insert",
            Mode::Ex => "ex",
        }
    }
}

/// Logical cursor position: zero-based line and char column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Which document lines are mapped onto the buffer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top_line: usize,
    /// Buffer window rows (always >= 1).
    pub height: u16,
    /// Buffer window columns (always >= 1).
    pub width: u16,
}

impl Viewport {
    /// Viewport for a whole screen of `cols` x `rows`, leaving [`STATUS_ROWS`] below.
    pub fn for_screen(cols: u16, rows: u16) -> Self {
        Self {
            top_line: 0,
            height: rows.saturating_sub(STATUS_ROWS).max(1),
            width: cols.max(1),
        }
    }

    /// Last line index mapped onto the window (may be past the end of the document).
    pub fn bottom_line(&self) -> usize {
        self.top_line + usize::from(self.height) - 1
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.top_line && line <= self.bottom_line()
    }

    /// Screen row showing `line`, if visible.
    pub fn row_of(&self, line: usize) -> Option<u16> {
        self.contains(line).then(|| (line - self.top_line) as u16)
    }

    /// Document line shown at window `row`.
    pub fn line_at(&self, row: u16) -> usize {
        self.top_line + usize::from(row)
    }
}

/// Text of the last linewise yank or delete.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Register {
    lines: Vec<String>,
}

impl Register {
    pub fn set(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Top-level editing state for one session.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub mode: Mode,
    pub cursor: CursorPosition,
    pub viewport: Viewport,
    pub accumulator: Accumulator,
    pub operator: OperatorPendingState,
    pub ex_line: ExLineBuffer,
    pub messages: StatusMessages,
    pub register: Register,
    /// Keys of the multi-key command in progress (count digits and operator keys).
    pending_keys: String,
    stop_requested: bool,
}

impl EditorState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            mode: Mode::Command,
            cursor: CursorPosition::default(),
            viewport,
            accumulator: Accumulator::new(),
            operator: OperatorPendingState::default(),
            ex_line: ExLineBuffer::default(),
            messages: StatusMessages::default(),
            register: Register::default(),
            pending_keys: String::new(),
            stop_requested: false,
        }
    }

    /// Switch mode. Entering or leaving ex mode empties the ex line, and any pending
    /// count or operator is dropped.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!(target: "state.mode", from = self.mode.name(), to = mode.name(), "mode_change");
        if self.mode == Mode::Ex || mode == Mode::Ex {
            self.ex_line.clear();
        }
        self.reset_pending();
        self.mode = mode;
    }

    /// Forget the count, the pending operator and the pending-command display.
    pub fn reset_pending(&mut self) {
        self.accumulator.reset();
        self.operator.clear();
        self.pending_keys.clear();
    }

    pub fn push_pending_key(&mut self, key: char) {
        self.pending_keys.push(key);
    }

    /// Keys consumed so far for a multi-key command, e.g. `2d`.
    pub fn pending_command(&self) -> &str {
        &self.pending_keys
    }

    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Verify the cursor and viewport against the document. Returns a description of the
    /// first broken invariant.
    pub fn check_invariants(&self, doc: &dyn Document) -> Result<(), String> {
        let lines = doc.line_count();
        if lines == 0 {
            return Err("document has no lines".to_string());
        }
        let CursorPosition { line, column } = self.cursor;
        if line >= lines {
            return Err(format!("cursor line {line} >= line count {lines}"));
        }
        let len = doc.line_length(line);
        if column > len {
            return Err(format!("cursor column {column} > line {line} length {len}"));
        }
        if !self.viewport.contains(line) {
            return Err(format!(
                "cursor line {line} outside viewport {}..={}",
                self.viewport.top_line,
                self.viewport.bottom_line()
            ));
        }
        if self.viewport.top_line >= lines {
            return Err(format!(
                "viewport top {} past last line {}",
                self.viewport.top_line,
                lines - 1
            ));
        }
        Ok(())
    }
}
