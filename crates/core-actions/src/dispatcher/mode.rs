//! Command mode commands that switch mode (`i I a A o O s S :`).

use super::EditContext;
use crate::EngineError;
use crate::keymap::HandlerId;
use core_state::{CursorPosition, Mode};

pub(crate) fn run_command(ctx: &mut EditContext<'_>, handler: HandlerId) -> Result<(), EngineError> {
    let CursorPosition { line, column } = ctx.state.cursor;
    let len = ctx.doc.line_length(line);
    match handler {
        HandlerId::InsertBefore | HandlerId::Substitute | HandlerId::SubstituteLine => {}
        HandlerId::InsertAtLineStart => ctx.state.cursor.column = 0,
        HandlerId::Append => ctx.state.cursor.column = (column + 1).min(len),
        HandlerId::AppendAtLineEnd => ctx.state.cursor.column = len,
        HandlerId::OpenBelow => {
            ctx.doc.add_line(line + 1, "");
            ctx.shift_rows_from(line + 1, -1);
            ctx.state.cursor = CursorPosition::new(line + 1, 0);
        }
        HandlerId::OpenAbove => {
            ctx.doc.add_line(line, "");
            ctx.shift_rows_from(line, -1);
            ctx.state.cursor = CursorPosition::new(line, 0);
        }
        HandlerId::EnterEx => {
            ctx.state.set_mode(Mode::Ex);
            return Ok(());
        }
        other => {
            return Err(EngineError::InvariantViolation(format!(
                "{other:?} is not a command mode command"
            )));
        }
    }
    ctx.state.set_mode(Mode::Insert);
    Ok(())
}
