//! Ex command execution (`:q`, `:w`, `:e`, ...).

use super::EditContext;
use super::command_parser::{CommandParser, ExCommand};
use crate::EngineError;
use core_state::{CursorPosition, Mode};
use core_text::DocumentError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Enter in ex mode: run the typed command and return to command mode.
pub(crate) fn execute(ctx: &mut EditContext<'_>) -> Result<(), EngineError> {
    let raw = ctx.state.ex_line.take();
    ctx.state.set_mode(Mode::Command);
    let cmd = CommandParser::parse(&raw);
    debug!(target: "actions.ex", ?cmd, "ex_command");
    match cmd {
        ExCommand::Empty => Ok(()),
        ExCommand::Quit => {
            ctx.state.request_stop();
            Ok(())
        }
        ExCommand::Write(path) => write(ctx, path.as_deref()).map(|_| ()),
        ExCommand::WriteQuit(path) => {
            write(ctx, path.as_deref())?;
            ctx.state.request_stop();
            Ok(())
        }
        ExCommand::Edit(path) => edit(ctx, path),
        ExCommand::Unknown(cmd) => Err(EngineError::UnknownCommand(cmd)),
    }
}

/// Persist to `path`, or to the document's own file. Returns the path written.
pub(crate) fn write(ctx: &mut EditContext<'_>, path: Option<&Path>) -> Result<PathBuf, EngineError> {
    let target = path
        .or_else(|| ctx.doc.path())
        .map(Path::to_path_buf)
        .ok_or(DocumentError::NoFileName)?;
    ctx.doc.persist(&target)?;
    info!(target: "actions.ex", file = %target.display(), lines = ctx.doc.line_count(), "written");
    ctx.state
        .messages
        .notify(format!("\"{}\" written", target.display()));
    Ok(target)
}

fn edit(ctx: &mut EditContext<'_>, path: Option<PathBuf>) -> Result<(), EngineError> {
    let path = path.ok_or(DocumentError::NoFileName)?;
    ctx.doc.open(&path)?;
    ctx.state.cursor = CursorPosition::default();
    ctx.state.viewport.top_line = 0;
    ctx.request_repaint();
    ctx.state.messages.notify(format!(
        "\"{}\" {} lines",
        path.display(),
        ctx.doc.line_count()
    ));
    Ok(())
}
