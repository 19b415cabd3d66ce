//! Drawing the editor onto a [`core_terminal::Screen`].
//!
//! * `viewport`: maps document lines onto window rows, scrolls, places the cursor.
//! * `status`: the status bar and message line below the window.
//! * `clock`: time source and formatting for the status bar clock.

pub mod clock;
pub mod status;
pub mod viewport;

pub use clock::{Clock, FixedClock, SystemClock, format_clock};
pub use status::{StatusContext, StatusSegment, compose_status, draw_status};
pub use viewport::{FILLER_GLYPH, ViewportCoordinator};
