//! Operator-pending composition: `d`, `c` and `y` followed by a vertical
//! motion or by the same operator key.
//!
//! Operators are linewise. A count typed before the operator and one typed
//! after it multiply, and the whole composition repeats that many times
//! (`2dj` deletes with `dj` twice). Repetitions stop at the first motion that
//! is blocked at a buffer edge.

use super::EditContext;
use super::motion::{ColumnReach, Motion, max_column};
use crate::EngineError;
use core_state::{CursorPosition, Mode, Operator};
use tracing::debug;

/// What the operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// `dd`, `cc`, `yy`.
    CurrentLine,
    Motion(Motion),
}

/// Operator key in command mode. Starts a composition, or completes one on the current
/// line when the same operator is already pending.
pub(crate) fn on_operator_key(ctx: &mut EditContext<'_>, op: Operator) -> Result<(), EngineError> {
    match ctx.state.operator.pending() {
        None => {
            let prefix = ctx.state.accumulator.take();
            ctx.state.operator.set_flag(op);
            ctx.state.operator.set_prefix_count(prefix);
            ctx.state.push_pending_key(op.key());
            debug!(target: "actions.operator", op = op.name(), prefix, "operator_pending");
            Ok(())
        }
        Some(pending) if pending == op => compose(ctx, op, Target::CurrentLine),
        Some(_) => {
            ctx.state.reset_pending();
            Err(EngineError::InvalidCommand)
        }
    }
}

/// A vertical motion while an operator is pending.
pub(crate) fn complete_with_motion(ctx: &mut EditContext<'_>, motion: Motion) -> Result<(), EngineError> {
    match ctx.state.operator.pending() {
        Some(op) => compose(ctx, op, Target::Motion(motion)),
        None => Err(EngineError::InvariantViolation(
            "operator completion without a pending operator".to_string(),
        )),
    }
}

/// Result of one repetition.
enum Step {
    Applied,
    Blocked,
}

struct Composition {
    op: Operator,
    target: Target,
    removed: Vec<String>,
    yanked: usize,
    /// The document became empty and an empty line was put back at index 0.
    refilled: bool,
    first_line: usize,
}

fn compose(ctx: &mut EditContext<'_>, op: Operator, target: Target) -> Result<(), EngineError> {
    let prefix = ctx.state.operator.prefix_count();
    ctx.state.accumulator.scale(prefix);
    let repetitions = ctx.state.accumulator.repetitions();

    let mut comp = Composition {
        op,
        target,
        removed: Vec::new(),
        yanked: 0,
        refilled: false,
        first_line: ctx.state.cursor.line,
    };
    let mut applied = 0u32;
    let mut accumulator = std::mem::take(&mut ctx.state.accumulator);
    let _ = accumulator.run(|_| match apply_once(ctx, &mut comp) {
        Step::Applied => {
            applied += 1;
            Ok(())
        }
        Step::Blocked => Err(()),
    });
    ctx.state.reset_pending();
    debug!(
        target: "actions.operator",
        op = op.name(),
        ?target,
        repetitions,
        applied,
        "operator_done"
    );

    if applied == 0 {
        return Ok(());
    }
    match op {
        Operator::Delete => {
            ctx.state.register.set(std::mem::take(&mut comp.removed));
        }
        Operator::Change => {
            ctx.state.register.set(std::mem::take(&mut comp.removed));
            if !comp.refilled {
                ctx.doc.add_line(comp.first_line, "");
            }
            ctx.state.cursor = CursorPosition::new(comp.first_line, 0);
            ctx.state.set_mode(Mode::Insert);
        }
        Operator::Yank => {
            let n = comp.yanked;
            let noun = if n == 1 { "line" } else { "lines" };
            ctx.state.messages.notify(format!("{n} {noun} yanked"));
        }
    }
    ctx.request_repaint();
    Ok(())
}

fn apply_once(ctx: &mut EditContext<'_>, comp: &mut Composition) -> Step {
    // Nothing left to do: the range is already yanked or the document was emptied.
    if (comp.op == Operator::Yank && comp.yanked > 0) || comp.refilled {
        return Step::Blocked;
    }
    let start = ctx.state.cursor.line;
    let end = match comp.target {
        Target::CurrentLine => start,
        Target::Motion(m) => {
            let page = ctx.page_size();
            let to = m.apply(ctx.state.cursor, &*ctx.doc, page, ColumnReach::LastChar);
            if to.line == start {
                return Step::Blocked;
            }
            to.line
        }
    };
    let (first, last) = (start.min(end), start.max(end));
    debug_assert!(last < ctx.doc.line_count(), "operator range past document end");
    comp.first_line = first;

    match comp.op {
        Operator::Yank => {
            ctx.state
                .register
                .set((first..=last).map(|l| ctx.doc.line(l)).collect());
            comp.yanked = last - first + 1;
            let column = ctx
                .state
                .cursor
                .column
                .min(max_column(&*ctx.doc, first, ColumnReach::LastChar));
            ctx.state.cursor = CursorPosition::new(first, column);
        }
        Operator::Delete | Operator::Change => {
            for _ in first..=last {
                comp.removed.push(ctx.doc.delete_line(first));
            }
            if ctx.doc.line_count() == 0 {
                ctx.doc.add_line(0, "");
                comp.refilled = true;
            }
            let line = first.min(ctx.doc.line_count() - 1);
            ctx.state.cursor = CursorPosition::new(line, 0);
        }
    }
    Step::Applied
}
