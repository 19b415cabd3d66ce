//! Engine entry points.
//!
//! Every key event runs the same cycle:
//! 1. clear transient status messages;
//! 2. Ctrl-C short-circuits to a stop request;
//! 3. the mode dispatcher runs the bound handler;
//! 4. the viewport is reconciled with the logical cursor;
//! 5. invariants are checked;
//! 6. the status rows are drawn, the cursor placed and the screen flushed.

use crate::EngineError;
use crate::dispatcher::motion::{ColumnReach, max_column};
use crate::dispatcher::{self, EditContext};
use crate::keymap::KeyTable;
use core_config::Config;
use core_events::{CTRL_C, KeyEvent};
use core_render::status::{StatusContext, draw_status};
use core_render::{Clock, SystemClock, ViewportCoordinator, format_clock};
use core_state::{CursorPosition, EditorState, Mode, Severity, Viewport};
use core_terminal::{Screen, text_width};
use core_text::Document;
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

pub struct Engine<D: Document, S: Screen> {
    state: EditorState,
    doc: D,
    screen: S,
    config: Config,
    clock: Box<dyn Clock>,
    keys: KeyTable,
}

impl<D: Document, S: Screen> Engine<D, S> {
    pub fn new(doc: D, screen: S, config: Config) -> Self {
        let (rows, cols) = screen.bounds();
        Self {
            state: EditorState::new(Viewport::for_screen(cols, rows)),
            doc,
            screen,
            config,
            clock: Box::new(SystemClock),
            keys: KeyTable::new(),
        }
    }

    /// Replace the status bar time source.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn doc(&self) -> &D {
        &self.doc
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn stop_requested(&self) -> bool {
        self.state.stop_requested()
    }

    /// Open `path` (if any) and paint the first screen. A file that cannot be opened is
    /// reported on the status line; its path is kept so a later write creates it.
    pub fn handle_load(&mut self, path: Option<&Path>) {
        self.state.messages.clear();
        if let Some(path) = path {
            match self.doc.open(path) {
                Ok(()) => info!(
                    target: "actions.dispatch",
                    file = %path.display(),
                    lines = self.doc.line_count(),
                    "loaded"
                ),
                Err(e) => {
                    warn!(target: "actions.dispatch", error = %e, "load_failed");
                    self.doc.set_path(path);
                    self.state.messages.set_error(e.to_string());
                }
            }
        }
        self.state.cursor = CursorPosition::default();
        self.state.viewport.top_line = 0;
        self.coordinator().repaint_all();
        self.finish_cycle();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        self.state.messages.clear();
        if self.config.log_contents() {
            trace!(target: "actions.dispatch", mode = self.state.mode.name(), %key, "key");
        } else {
            trace!(
                target: "actions.dispatch",
                mode = self.state.mode.name(),
                kind = key_kind(&key),
                "key"
            );
        }

        if key == KeyEvent::ControlCode(CTRL_C) {
            info!(target: "actions.dispatch", "interrupt");
            self.state.request_stop();
            return;
        }

        let mut ctx = EditContext::new(&mut self.state, &mut self.doc, &mut self.screen);
        let result = dispatcher::dispatch(&mut ctx, &self.keys, key);
        let repaint = ctx.repaint_requested();
        if let Err(err) = result {
            self.report(err);
        }

        if self.state.mode == Mode::Command {
            let line = self.state.cursor.line;
            let max = max_column(&self.doc, line, ColumnReach::LastChar);
            self.state.cursor.column = self.state.cursor.column.min(max);
        }
        if self.config.log_contents() {
            let line = self.state.cursor.line;
            trace!(target: "actions.dispatch", line, text = %self.doc.line(line), "cursor_line");
        }
        self.reconcile(repaint);
        self.finish_cycle();
    }

    /// Periodic tick: refresh the clock. Never touches editing state.
    pub fn handle_tick(&mut self) {
        self.draw_status();
        self.place_cursor();
        self.flush();
    }

    /// New terminal size: recompute the window, keep the cursor visible, repaint.
    pub fn handle_resize(&mut self, cols: u16, rows: u16) {
        debug!(target: "actions.dispatch", cols, rows, "resize");
        self.coordinator().resize(cols, rows);
        self.reconcile(true);
        self.finish_cycle();
    }

    fn coordinator(&mut self) -> ViewportCoordinator<'_> {
        ViewportCoordinator::new(&mut self.state.viewport, &self.doc, &mut self.screen)
    }

    fn report(&mut self, err: EngineError) {
        match err.severity() {
            Severity::Warning => debug!(target: "actions.dispatch", %err, "user_warning"),
            _ => warn!(target: "actions.dispatch", %err, "command_failed"),
        }
        if let EngineError::InvariantViolation(detail) = &err {
            error!(target: "actions.dispatch", detail = %detail, "invariant_violation");
        }
        self.state.messages.set(err.severity(), err.to_string());
    }

    fn reconcile(&mut self, repaint_all: bool) {
        let CursorPosition { line, column } = self.state.cursor;
        let mut vc = self.coordinator();
        vc.move_to(line, column);
        if repaint_all {
            vc.repaint_all();
        }
    }

    fn finish_cycle(&mut self) {
        if let Err(detail) = self.state.check_invariants(&self.doc) {
            error!(target: "actions.dispatch", %detail, "invariant_violation");
            debug_assert!(false, "invariant violated: {detail}");
            self.state
                .messages
                .set_error(EngineError::InvariantViolation(detail).to_string());
        }
        self.draw_status();
        self.place_cursor();
        self.flush();
    }

    fn draw_status(&mut self) {
        let clock = format_clock(self.clock.now_epoch_secs(), self.config.clock());
        let ctx = StatusContext {
            mode: self.state.mode,
            cursor: self.state.cursor,
            viewport: self.state.viewport,
            line_count: self.doc.line_count(),
            pending_command: self.state.pending_command(),
            messages: &self.state.messages,
            ex_line: &self.state.ex_line,
            clock: Some(clock),
        };
        draw_status(&mut self.screen, self.state.viewport.height, &ctx);
    }

    fn place_cursor(&mut self) {
        if self.state.mode == Mode::Ex {
            let row = self.state.viewport.height + 1;
            let (_, cols) = self.screen.bounds();
            let col = text_width(&self.state.ex_line.display());
            let col = col.min(usize::from(cols.saturating_sub(1))) as u16;
            self.screen.set_cursor(row, col);
            return;
        }
        let CursorPosition { line, column } = self.state.cursor;
        if self.state.viewport.contains(line) {
            self.coordinator().place_cursor(line, column);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.screen.flush() {
            error!(target: "actions.dispatch", error = %e, "flush_failed");
        }
    }
}

fn key_kind(key: &KeyEvent) -> &'static str {
    match key {
        KeyEvent::Printable(_) => "printable",
        KeyEvent::Special(_) => "special",
        KeyEvent::ControlCode(_) => "control",
    }
}
