#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::Engine;
use core_config::Config;
use core_events::{
    BACKSPACE_DEL, CTRL_A, CTRL_C, CTRL_E, CTRL_L, CTRL_S, ENTER, ESCAPE, KeyEvent, SpecialKey,
    TAB,
};
use core_render::FixedClock;
use core_terminal::GridScreen;
use core_text::{Buffer, Document};

pub type TestEngine = Engine<Buffer, GridScreen>;

/// 2021-01-01T13:05:09Z
pub const FIXED_TIME: i64 = 1_609_506_309;

/// Engine over `text` on a `cols` x `rows` grid, first screen already painted.
pub fn engine_with(text: &str, cols: u16, rows: u16) -> TestEngine {
    let mut config = Config::default();
    config.file.clock.utc_offset_minutes = Some(0);
    let mut e = Engine::new(Buffer::from_text(text), GridScreen::new(cols, rows), config)
    .with_clock(Box::new(FixedClock(FIXED_TIME)));
    e.handle_load(None);
    e
}

pub fn engine(text: &str) -> TestEngine {
    engine_with(text, 40, 12)
}

/// `n` lines named `line0`, `line1`, ...
pub fn numbered(n: usize) -> String {
    (0..n).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n")
}

/// Parse vi-style key notation: literal characters plus `<Esc>`, `<CR>`, `<Tab>`, `<BS>`,
/// `<Up>`, `<Down>`, `<Left>`, `<Right>`, `<Home>`, `<End>`, `<PageUp>`,
/// `<PageDown>`, `<Ins>`, `<Del>`, `<C-a>`, `<C-c>`, `<C-e>`, `<C-l>`, `<C-s>`.
pub fn keys(notation: &str) -> Vec<KeyEvent> {
    let mut out = Vec::new();
    let mut rest = notation;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(end) = rest.find('>')
        {
            let name = &rest[1..end];
            if let Some(key) = named_key(name) {
                out.push(key);
                rest = &rest[end + 1..];
                continue;
            }
        }
        out.push(KeyEvent::Printable(c));
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn named_key(name: &str) -> Option<KeyEvent> {
    use KeyEvent::{ControlCode, Special};
    Some(match name {
        "Esc" => ControlCode(ESCAPE),
        "CR" => ControlCode(ENTER),
        "Tab" => ControlCode(TAB),
        "BS" => ControlCode(BACKSPACE_DEL),
        "Up" => Special(SpecialKey::Up),
        "Down" => Special(SpecialKey::Down),
        "Left" => Special(SpecialKey::Left),
        "Right" => Special(SpecialKey::Right),
        "Home" => Special(SpecialKey::Home),
        "End" => Special(SpecialKey::End),
        "PageUp" => Special(SpecialKey::PageUp),
        "PageDown" => Special(SpecialKey::PageDown),
        "Ins" => Special(SpecialKey::Insert),
        "Del" => Special(SpecialKey::Delete),
        "C-a" => ControlCode(CTRL_A),
        "C-c" => ControlCode(CTRL_C),
        "C-e" => ControlCode(CTRL_E),
        "C-l" => ControlCode(CTRL_L),
        "C-s" => ControlCode(CTRL_S),
        _ => return None,
    })
}

pub fn feed(e: &mut TestEngine, notation: &str) {
    for key in keys(notation) {
        e.handle_key_event(key);
    }
}

pub fn lines(e: &TestEngine) -> Vec<String> {
    let doc = e.doc();
    (0..doc.line_count()).map(|i| doc.line(i)).collect()
}

pub fn cursor(e: &TestEngine) -> (usize, usize) {
    let c = e.state().cursor;
    (c.line, c.column)
}

/// Text of the message row (second status row).
pub fn message_row(e: &TestEngine) -> String {
    e.screen().row_text(e.state().viewport.height + 1)
}

pub fn status_bar(e: &TestEngine) -> String {
    e.screen().row_text(e.state().viewport.height)
}
