//! Mode dispatcher.
//!
//! One key event is routed by the current [`Mode`] to its handler set:
//! * `motion`   - cursor motions shared by command and insert mode
//! * `operator` - `d` / `c` / `y` composition with motions and counts
//! * `mode`     - command mode commands entering insert or ex mode
//! * `edit`     - insert mode text entry and saving
//! * `command`  - ex command line editing and execution
//!
//! Handlers only mutate logical state and the document, plus local row
//! repaints for edits. The engine reconciles the viewport afterwards.

use crate::EngineError;
use crate::keymap::{HandlerId, KeyTable};
use core_events::KeyEvent;
use core_render::ViewportCoordinator;
use core_state::{EditorState, Mode};
use core_terminal::Screen;
use core_text::Document;
use tracing::trace;

pub mod command;
pub mod command_parser;
pub mod edit;
pub mod mode;
pub mod motion;
pub mod operator;

/// Everything a handler may touch while processing one key.
pub struct EditContext<'a> {
    pub state: &'a mut EditorState,
    pub doc: &'a mut dyn Document,
    pub screen: &'a mut dyn Screen,
    repaint_all: bool,
}

impl<'a> EditContext<'a> {
    pub fn new(
        state: &'a mut EditorState,
        doc: &'a mut dyn Document,
        screen: &'a mut dyn Screen,
    ) -> Self {
        Self {
            state,
            doc,
            screen,
            repaint_all: false,
        }
    }

    pub fn coordinator(&mut self) -> ViewportCoordinator<'_> {
        ViewportCoordinator::new(&mut self.state.viewport, &*self.doc, &mut *self.screen)
    }

    /// PageUp / PageDown distance.
    pub fn page_size(&self) -> usize {
        usize::from(self.state.viewport.height.saturating_sub(1)).max(1)
    }

    /// Ask for the whole window to be repainted once the key is processed.
    pub fn request_repaint(&mut self) {
        self.repaint_all = true;
    }

    pub fn repaint_requested(&self) -> bool {
        self.repaint_all
    }

    /// Redraw after `delta` lines were removed (positive) or inserted (negative) so that
    /// `line` is the first row whose content moved.
    pub(crate) fn shift_rows_from(&mut self, line: usize, delta: isize) {
        let last = self.state.viewport.height - 1;
        match self.state.viewport.row_of(line) {
            Some(row) if row > 0 => {
                self.coordinator().scroll_region(delta, row, last);
            }
            Some(_) => self.coordinator().repaint_all(),
            None => self.coordinator().repaint_from_line(line),
        }
    }

    /// Repaint the row showing `line`, if any.
    pub(crate) fn repaint_line(&mut self, line: usize) {
        if let Some(row) = self.state.viewport.row_of(line) {
            self.coordinator().paint_row(row);
        }
    }
}

/// Route `key` to the handler for the current mode.
pub fn dispatch(ctx: &mut EditContext<'_>, keys: &KeyTable, key: KeyEvent) -> Result<(), EngineError> {
    match ctx.state.mode {
        Mode::Command => dispatch_command(ctx, keys, key),
        Mode::Insert => dispatch_insert(ctx, keys, key),
        Mode::Ex => dispatch_ex(ctx, keys, key),
    }
}

fn dispatch_command(ctx: &mut EditContext<'_>, keys: &KeyTable, key: KeyEvent) -> Result<(), EngineError> {
    if let (Some(d), KeyEvent::Printable(c)) = (key.digit(), key)
        && (d != 0 || ctx.state.accumulator.is_pending())
    {
        ctx.state.accumulator.add_digit(d);
        ctx.state.push_pending_key(c);
        trace!(target: "actions.dispatch", count = ctx.state.accumulator.count(), "count_digit");
        return Ok(());
    }

    let Some(binding) = keys.lookup(Mode::Command, key) else {
        ctx.state.reset_pending();
        return Err(EngineError::NotImplemented(key.describe()));
    };
    if ctx.state.operator.check(binding.incompatible) {
        trace!(
            target: "actions.operator",
            pending = ?ctx.state.operator.flags(),
            %key,
            "incompatible_key"
        );
        ctx.state.reset_pending();
        return Err(EngineError::InvalidCommand);
    }

    match binding.handler {
        HandlerId::Operator(op) => operator::on_operator_key(ctx, op),
        HandlerId::Motion(m) if ctx.state.operator.pending().is_some() => {
            operator::complete_with_motion(ctx, m)
        }
        HandlerId::Motion(m) => {
            motion::run_motion(ctx, m);
            ctx.state.reset_pending();
            Ok(())
        }
        HandlerId::Cancel => {
            ctx.state.reset_pending();
            Ok(())
        }
        HandlerId::Repaint => {
            ctx.state.reset_pending();
            repaint(ctx);
            Ok(())
        }
        other => {
            ctx.state.reset_pending();
            mode::run_command(ctx, other)
        }
    }
}

fn dispatch_insert(ctx: &mut EditContext<'_>, keys: &KeyTable, key: KeyEvent) -> Result<(), EngineError> {
    if let KeyEvent::Printable(c) = key {
        edit::insert_char(ctx, c);
        return Ok(());
    }
    let Some(binding) = keys.lookup(Mode::Insert, key) else {
        return Err(EngineError::NotImplemented(key.describe()));
    };
    match binding.handler {
        HandlerId::InsertMotion(m) => {
            motion::run_motion(ctx, m);
            Ok(())
        }
        HandlerId::Newline => {
            edit::newline(ctx);
            Ok(())
        }
        HandlerId::Tab => {
            edit::insert_char(ctx, '\t');
            Ok(())
        }
        HandlerId::Backspace => {
            edit::backspace(ctx);
            Ok(())
        }
        HandlerId::Save => edit::save(ctx),
        HandlerId::LeaveInsert => {
            edit::leave_insert(ctx);
            Ok(())
        }
        HandlerId::Repaint => {
            repaint(ctx);
            Ok(())
        }
        other => Err(EngineError::InvariantViolation(format!(
            "{other:?} bound in insert mode"
        ))),
    }
}

fn dispatch_ex(ctx: &mut EditContext<'_>, keys: &KeyTable, key: KeyEvent) -> Result<(), EngineError> {
    if let KeyEvent::Printable(c) = key {
        ctx.state.ex_line.push(c);
        return Ok(());
    }
    let Some(binding) = keys.lookup(Mode::Ex, key) else {
        return Err(EngineError::NotImplemented(key.describe()));
    };
    match binding.handler {
        HandlerId::ExExecute => command::execute(ctx),
        HandlerId::ExBackspace => {
            if !ctx.state.ex_line.backspace() {
                ctx.state.set_mode(Mode::Command);
            }
            Ok(())
        }
        HandlerId::ExCancel => {
            ctx.state.set_mode(Mode::Command);
            Ok(())
        }
        other => Err(EngineError::InvariantViolation(format!(
            "{other:?} bound in ex mode"
        ))),
    }
}

/// Ctrl-L: throw away what the terminal shows and redraw everything.
fn repaint(ctx: &mut EditContext<'_>) {
    ctx.screen.force_full_redraw();
    ctx.request_repaint();
}
