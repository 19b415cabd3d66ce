//! Status line composition and drawing.
//!
//! Two rows sit under the buffer window:
//! * the bar (reverse video): `line,col (pct%)` on the left, the clock on the right;
//! * the message line: the ex command line while in ex mode, otherwise the most
//!   severe transient message, else the mode indicator, with the pending
//!   command keys right-aligned when no message is visible.
//!
//! `compose_status` produces ordered segments; `draw_status` lays them out.

use core_state::{CursorPosition, ExLineBuffer, Mode, Severity, StatusMessages, Viewport};
use core_terminal::width::truncate_to_width;
use core_terminal::{Attr, Screen, text_width};

/// Snapshot of everything the status rows display.
pub struct StatusContext<'a> {
    pub mode: Mode,
    pub cursor: CursorPosition,
    pub viewport: Viewport,
    pub line_count: usize,
    pub pending_command: &'a str,
    pub messages: &'a StatusMessages,
    pub ex_line: &'a ExLineBuffer,
    pub clock: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// 1-based line and column.
    Position { line_1: usize, col_1: usize },
    /// How far through the document the bottom of the window is.
    Percent(usize),
    Clock(&'a str),
    ExLine(String),
    Message(Severity, &'a str),
    ModeIndicator(&'static str),
    PendingCommand(&'a str),
}

impl StatusSegment<'_> {
    pub fn text(&self) -> String {
        match self {
            StatusSegment::Position { line_1, col_1 } => format!("{line_1},{col_1}"),
            StatusSegment::Percent(p) => format!("({p}%)"),
            StatusSegment::Clock(c) => c.to_string(),
            StatusSegment::ExLine(s) => s.clone(),
            StatusSegment::Message(Severity::Error, m) => format!("ERROR: {m}"),
            StatusSegment::Message(Severity::Warning, m) => format!("WARNING: {m}"),
            StatusSegment::Message(Severity::Notification, m) => m.to_string(),
            StatusSegment::ModeIndicator(s) => s.to_string(),
            StatusSegment::PendingCommand(s) => s.to_string(),
        }
    }

    fn attr(&self) -> Attr {
        match self {
            StatusSegment::Message(Severity::Error, _) => Attr::ERROR,
            StatusSegment::Message(Severity::Warning, _) => Attr::WARNING,
            StatusSegment::ModeIndicator(_) => Attr::BOLD,
            _ => Attr::empty(),
        }
    }
}

/// Segments for the bar row and the message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLayout<'a> {
    pub bar_left: Vec<StatusSegment<'a>>,
    pub bar_right: Option<StatusSegment<'a>>,
    pub message_left: Option<StatusSegment<'a>>,
    pub message_right: Option<StatusSegment<'a>>,
}

/// Percentage of the document at or above the last window row, capped at 100.
pub fn percent_through(viewport: &Viewport, line_count: usize) -> usize {
    if line_count == 0 {
        return 100;
    }
    let bottom = viewport.top_line + usize::from(viewport.height);
    (bottom * 100 / line_count).min(100)
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> StatusLayout<'a> {
    let bar_left = vec![
        StatusSegment::Position {
            line_1: ctx.cursor.line + 1,
            col_1: ctx.cursor.column + 1,
        },
        StatusSegment::Percent(percent_through(&ctx.viewport, ctx.line_count)),
    ];
    let bar_right = ctx.clock.as_deref().map(StatusSegment::Clock);

    if ctx.mode == Mode::Ex {
        return StatusLayout {
            bar_left,
            bar_right,
            message_left: Some(StatusSegment::ExLine(ctx.ex_line.display())),
            message_right: None,
        };
    }

    let (message_left, message_right) = match ctx.messages.visible() {
        Some((severity, text)) => (Some(StatusSegment::Message(severity, text)), None),
        None => {
            let indicator = (ctx.mode == Mode::Insert).then_some(StatusSegment::ModeIndicator("-- INSERT --"));
            let pending = (!ctx.pending_command.is_empty())
                .then_some(StatusSegment::PendingCommand(ctx.pending_command));
            (indicator, pending)
        }
    };

    StatusLayout {
        bar_left,
        bar_right,
        message_left,
        message_right,
    }
}

/// Lay out `left` and `right` within `width` screen cells. The right part is dropped when
/// it does not fit after the left part and one separating blank.
pub fn fit_line(width: usize, left: &str, right: &str) -> String {
    let left_len = text_width(left);
    let right_len = text_width(right);
    if right.is_empty() || left_len + 1 + right_len > width {
        return truncate_to_width(left, width).to_string();
    }
    let mut out = String::with_capacity(width);
    out.push_str(left);
    out.extend(std::iter::repeat_n(' ', width - left_len - right_len));
    out.push_str(right);
    out
}

/// Draw both status rows starting at `first_row`. The screen cursor is left wherever
/// drawing ended; the caller places it afterwards.
pub fn draw_status(screen: &mut dyn Screen, first_row: u16, ctx: &StatusContext<'_>) {
    let (_, cols) = screen.bounds();
    let width = usize::from(cols);
    let layout = compose_status(ctx);

    let left = layout
        .bar_left
        .iter()
        .map(StatusSegment::text)
        .collect::<Vec<_>>()
        .join(" ");
    let right = layout.bar_right.as_ref().map(StatusSegment::text).unwrap_or_default();
    let bar = fit_line(width, &format!(" {left}"), &format!("{right} "));
    let padded = format!("{bar:<width$}");
    screen.attr_on(Attr::STANDOUT);
    screen.write_text(first_row, 0, &padded);
    screen.attr_off(Attr::STANDOUT);

    let msg_row = first_row + 1;
    match &layout.message_left {
        Some(seg) => {
            let attr = seg.attr();
            screen.attr_on(attr);
            screen.write_text(msg_row, 0, &seg.text());
            screen.attr_off(attr);
            screen.clear_to_end_of_line();
        }
        None => {
            screen.set_cursor(msg_row, 0);
            screen.clear_to_end_of_line();
        }
    }
    if let Some(seg) = &layout.message_right {
        let text = seg.text();
        let len = text_width(&text);
        let used = layout
            .message_left
            .as_ref()
            .map(|s| text_width(&s.text()))
            .unwrap_or(0);
        if used + 1 + len < width {
            screen.write_text(msg_row, (width - len - 1) as u16, &text);
        }
    }
    tracing::trace!(target: "render.status", mode = ctx.mode.name(), "status_drawn");
}
