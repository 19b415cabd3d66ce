use core_events::{ENTER, ESCAPE, Event, InputEvent, KeyEvent, SpecialKey, TAB};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Translate a terminal event into an editor event.
///
/// Returns `None` for events the editor does not consume (mouse, focus, paste,
/// key releases, unsupported keys).
pub fn translate_event(event: CEvent) -> Option<Event> {
    match event {
        CEvent::Key(key) => translate_key(&key).map(|k| Event::Input(InputEvent::Key(k))),
        CEvent::Resize(w, h) => Some(Event::Input(InputEvent::Resize(w, h))),
        _ => None,
    }
}

/// Resolve a crossterm key press into a [`KeyEvent`].
///
/// Control chords on letters and on `@`..`_` become their ASCII control code,
/// so Ctrl-C arrives as `ControlCode(3)` and Ctrl-[ as Escape.
pub fn translate_key(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let key = match event.code {
        CKeyCode::Char(c) if event.modifiers.contains(CKeyModifiers::CONTROL) => {
            control_code(c).map_or(KeyEvent::Printable(c), KeyEvent::ControlCode)
        }
        CKeyCode::Char(c) => KeyEvent::Printable(c),
        CKeyCode::Enter => KeyEvent::ControlCode(ENTER),
        CKeyCode::Esc => KeyEvent::ControlCode(ESCAPE),
        CKeyCode::Tab | CKeyCode::BackTab => KeyEvent::ControlCode(TAB),
        CKeyCode::Backspace => KeyEvent::Special(SpecialKey::Backspace),
        CKeyCode::Up => KeyEvent::Special(SpecialKey::Up),
        CKeyCode::Down => KeyEvent::Special(SpecialKey::Down),
        CKeyCode::Left => KeyEvent::Special(SpecialKey::Left),
        CKeyCode::Right => KeyEvent::Special(SpecialKey::Right),
        CKeyCode::Home => KeyEvent::Special(SpecialKey::Home),
        CKeyCode::End => KeyEvent::Special(SpecialKey::End),
        CKeyCode::PageUp => KeyEvent::Special(SpecialKey::PageUp),
        CKeyCode::PageDown => KeyEvent::Special(SpecialKey::PageDown),
        CKeyCode::Insert => KeyEvent::Special(SpecialKey::Insert),
        CKeyCode::Delete => KeyEvent::Special(SpecialKey::Delete),
        CKeyCode::F(n) => KeyEvent::Special(SpecialKey::F(n)),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(key)
}

fn control_code(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    match upper {
        '@'..='_' => Some(upper as u8 - b'@'),
        ' ' => Some(0),
        _ => None,
    }
}
