//! Operator-pending state (`d`, `c`, `y` waiting for a motion).

bitflags::bitflags! {
    /// Set of operators. Key bindings use it both for what is pending and for which
    /// pending operators a key cannot complete.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OperatorFlags: u8 {
        const DELETE = 0b001;
        const CHANGE = 0b010;
        const YANK   = 0b100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Delete,
    Change,
    Yank,
}

impl Operator {
    pub fn flag(self) -> OperatorFlags {
        match self {
            Operator::Delete => OperatorFlags::DELETE,
            Operator::Change => OperatorFlags::CHANGE,
            Operator::Yank => OperatorFlags::YANK,
        }
    }

    pub fn key(self) -> char {
        match self {
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::Yank => 'y',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Delete => "delete",
            Operator::Change => "change",
            Operator::Yank => "yank",
        }
    }
}

/// Pending operator flags plus the count typed before the operator key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperatorPendingState {
    flags: OperatorFlags,
    prefix_count: u32,
}

impl OperatorPendingState {
    pub fn set_flag(&mut self, op: Operator) {
        self.flags |= op.flag();
    }

    /// True when any of `ops` is pending.
    pub fn check(&self, ops: OperatorFlags) -> bool {
        self.flags.intersects(ops)
    }

    pub fn clear(&mut self) {
        self.flags = OperatorFlags::empty();
        self.prefix_count = 0;
    }

    pub fn flags(&self) -> OperatorFlags {
        self.flags
    }

    pub fn is_idle(&self) -> bool {
        self.flags.is_empty()
    }

    /// The pending operator. When several flags are set the first in
    /// delete/change/yank order wins; the key table never produces that state.
    pub fn pending(&self) -> Option<Operator> {
        [Operator::Delete, Operator::Change, Operator::Yank]
            .into_iter()
            .find(|op| self.flags.contains(op.flag()))
    }

    pub fn set_prefix_count(&mut self, count: u32) {
        self.prefix_count = count;
    }

    pub fn prefix_count(&self) -> u32 {
        self.prefix_count
    }
}
