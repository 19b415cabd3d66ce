//! Static key table: `(Mode, KeyEvent) -> Binding`.
//!
//! Built once when the engine is constructed. Printable keys that have no
//! binding in insert and ex mode are text; in command mode an unbound key is
//! reported as not implemented.

use crate::dispatcher::motion::Motion;
use core_events::{
    BACKSPACE_BS, BACKSPACE_DEL, CTRL_A, CTRL_E, CTRL_L, CTRL_S, ENTER, ESCAPE, KeyEvent,
    TAB,
    SpecialKey,
};
use core_state::{Mode, Operator, OperatorFlags};
use std::collections::HashMap;

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerId {
    // command mode
    Motion(Motion),
    Operator(Operator),
    Cancel,
    InsertBefore,
    InsertAtLineStart,
    Append,
    AppendAtLineEnd,
    OpenBelow,
    OpenAbove,
    Substitute,
    SubstituteLine,
    EnterEx,
    Repaint,
    // insert mode
    InsertMotion(Motion),
    Newline,
    Tab,
    Backspace,
    Save,
    LeaveInsert,
    // ex mode
    ExExecute,
    ExBackspace,
    ExCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub handler: HandlerId,
    /// Pending operators this key cannot complete.
    pub incompatible: OperatorFlags,
}

impl Binding {
    fn compatible(handler: HandlerId) -> Self {
        Self {
            handler,
            incompatible: OperatorFlags::empty(),
        }
    }

    fn exclusive(handler: HandlerId) -> Self {
        Self {
            handler,
            incompatible: OperatorFlags::all(),
        }
    }
}

const BACKSPACE_KEYS: [KeyEvent; 3] = [
    KeyEvent::Special(SpecialKey::Backspace),
    KeyEvent::ControlCode(BACKSPACE_BS),
    KeyEvent::ControlCode(BACKSPACE_DEL),
];

#[derive(Debug, Clone)]
pub struct KeyTable {
    bindings: HashMap<(Mode, KeyEvent), Binding>,
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTable {
    pub fn new() -> Self {
        let mut table = Self {
            bindings: HashMap::new(),
        };
        table.bind_command_mode();
        table.bind_insert_mode();
        table.bind_ex_mode();
        tracing::debug!(target: "actions.dispatch", bindings = table.len(), "key_table_built");
        table
    }

    fn bind(&mut self, mode: Mode, keys: &[KeyEvent], binding: Binding) {
        for key in keys {
            self.bindings.insert((mode, *key), binding);
        }
    }

    fn bind_command_mode(&mut self) {
        use KeyEvent::{ControlCode, Printable, Special};
        let linewise = OperatorFlags::all();
        let motions: [(&[KeyEvent], Motion); 8] = [
            (&[Printable('h'), Special(SpecialKey::Left)], Motion::Left),
            (&[Printable('l'), Special(SpecialKey::Right)], Motion::Right),
            (&[Printable('j'), Special(SpecialKey::Down)], Motion::Down),
            (&[Printable('k'), Special(SpecialKey::Up)], Motion::Up),
            (
                &[Printable('0'), Printable('^'), Special(SpecialKey::Home)],
                Motion::LineStart,
            ),
            (&[Printable('$'), Special(SpecialKey::End)], Motion::LineEnd),
            (&[Special(SpecialKey::PageDown)], Motion::PageDown),
            (&[Special(SpecialKey::PageUp)], Motion::PageUp),
        ];
        for (keys, motion) in motions {
            let incompatible = if motion.is_vertical() {
                OperatorFlags::empty()
            } else {
                linewise
            };
            self.bind(
                Mode::Command,
                keys,
                Binding {
                    handler: HandlerId::Motion(motion),
                    incompatible,
                },
            );
        }

        for op in [Operator::Delete, Operator::Change, Operator::Yank] {
            self.bind(
                Mode::Command,
                &[Printable(op.key())],
                Binding {
                    handler: HandlerId::Operator(op),
                    incompatible: OperatorFlags::all() - op.flag(),
                },
            );
        }

        let commands = [
            ('i', HandlerId::InsertBefore),
            ('I', HandlerId::InsertAtLineStart),
            ('a', HandlerId::Append),
            ('A', HandlerId::AppendAtLineEnd),
            ('o', HandlerId::OpenBelow),
            ('O', HandlerId::OpenAbove),
            ('s', HandlerId::Substitute),
            ('S', HandlerId::SubstituteLine),
            (':', HandlerId::EnterEx),
        ];
        for (key, handler) in commands {
            self.bind(Mode::Command, &[Printable(key)], Binding::exclusive(handler));
        }
        self.bind(
            Mode::Command,
            &[ControlCode(CTRL_L)],
            Binding::exclusive(HandlerId::Repaint),
        );
        self.bind(
            Mode::Command,
            &[ControlCode(ESCAPE)],
            Binding::compatible(HandlerId::Cancel),
        );
    }

    fn bind_insert_mode(&mut self) {
        use KeyEvent::{ControlCode, Special};
        let moves: [(&[KeyEvent], Motion); 8] = [
            (&[Special(SpecialKey::Left)], Motion::Left),
            (&[Special(SpecialKey::Right)], Motion::Right),
            (&[Special(SpecialKey::Up)], Motion::Up),
            (&[Special(SpecialKey::Down)], Motion::Down),
            (&[Special(SpecialKey::Home), ControlCode(CTRL_A)], Motion::LineStart),
            (&[Special(SpecialKey::End), ControlCode(CTRL_E)], Motion::LineEnd),
            (&[Special(SpecialKey::PageUp)], Motion::PageUp),
            (&[Special(SpecialKey::PageDown)], Motion::PageDown),
        ];
        for (keys, motion) in moves {
            self.bind(
                Mode::Insert,
                keys,
                Binding::compatible(HandlerId::InsertMotion(motion)),
            );
        }
        self.bind(Mode::Insert, &[ControlCode(ENTER)], Binding::compatible(HandlerId::Newline));
        self.bind(Mode::Insert, &[ControlCode(TAB)], Binding::compatible(HandlerId::Tab));
        self.bind(Mode::Insert, &BACKSPACE_KEYS, Binding::compatible(HandlerId::Backspace));
        self.bind(Mode::Insert, &[ControlCode(CTRL_S)], Binding::compatible(HandlerId::Save));
        self.bind(Mode::Insert, &[ControlCode(CTRL_L)], Binding::compatible(HandlerId::Repaint));
        self.bind(
            Mode::Insert,
            &[ControlCode(ESCAPE)],
            Binding::compatible(HandlerId::LeaveInsert),
        );
    }

    fn bind_ex_mode(&mut self) {
        use KeyEvent::ControlCode;
        self.bind(Mode::Ex, &[ControlCode(ENTER)], Binding::compatible(HandlerId::ExExecute));
        self.bind(Mode::Ex, &BACKSPACE_KEYS, Binding::compatible(HandlerId::ExBackspace));
        self.bind(Mode::Ex, &[ControlCode(ESCAPE)], Binding::compatible(HandlerId::ExCancel));
    }

    pub fn lookup(&self, mode: Mode, key: KeyEvent) -> Option<Binding> {
        self.bindings.get(&(mode, key)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
