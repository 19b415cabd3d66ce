//! Insert mode editing.

use super::EditContext;
use crate::EngineError;
use core_state::{CursorPosition, Mode};
use tracing::{debug, warn};

pub(crate) fn insert_char(ctx: &mut EditContext<'_>, c: char) {
    let CursorPosition { line, column } = ctx.state.cursor;
    let mut buf = [0u8; 4];
    ctx.doc.insert_text(line, column, c.encode_utf8(&mut buf));
    ctx.state.cursor.column = column + 1;
    ctx.repaint_line(line);
}

/// Enter: split the line at the cursor and move to the start of the new line.
pub(crate) fn newline(ctx: &mut EditContext<'_>) {
    let CursorPosition { line, column } = ctx.state.cursor;
    ctx.doc.split_line(line, column);
    ctx.shift_rows_from(line + 1, -1);
    ctx.repaint_line(line);
    ctx.state.cursor = CursorPosition::new(line + 1, 0);
}

/// Delete left of the cursor. At column 0 the line is joined onto the previous one.
pub(crate) fn backspace(ctx: &mut EditContext<'_>) {
    let CursorPosition { line, column } = ctx.state.cursor;
    if column > 0 {
        ctx.doc.erase_chars(line, column - 1, 1);
        ctx.state.cursor.column = column - 1;
        ctx.repaint_line(line);
        return;
    }
    if line == 0 {
        return;
    }
    let joined_at = ctx.doc.line_length(line - 1);
    let text = ctx.doc.delete_line(line);
    ctx.doc.append_text(line - 1, &text);
    ctx.shift_rows_from(line, 1);
    ctx.repaint_line(line - 1);
    ctx.state.cursor = CursorPosition::new(line - 1, joined_at);
}

/// Ctrl-S: write the document to its file.
pub(crate) fn save(ctx: &mut EditContext<'_>) -> Result<(), EngineError> {
    let Some(path) = ctx.doc.path().map(|p| p.to_path_buf()) else {
        warn!(target: "actions.dispatch", "save_without_path");
        return Err(EngineError::SaveFailed(core_text::DocumentError::NoFileName));
    };
    ctx.doc.persist(&path).map_err(|e| {
        warn!(target: "actions.dispatch", error = %e, "save_failed");
        EngineError::SaveFailed(e)
    })?;
    debug!(target: "actions.dispatch", file = %path.display(), "saved");
    ctx.state
        .messages
        .notify(format!("\"{}\" written", path.display()));
    Ok(())
}

/// Escape: back to command mode with the cursor one column left.
pub(crate) fn leave_insert(ctx: &mut EditContext<'_>) {
    ctx.state.set_mode(Mode::Command);
    ctx.state.cursor.column = ctx.state.cursor.column.saturating_sub(1);
}
