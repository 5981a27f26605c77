use std::ops::Deref;

use crate::Instruction;

/// Results of running a program, one entry per executed slot.
///
/// Never grows past its capacity. The engine stops pushing once only the
/// terminal slot is left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    entries: Vec<Instruction>,
    capacity: usize,
}

impl Trace {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether only the slot reserved for a terminal diagnostic is left.
    pub fn is_full(&self) -> bool {
        self.entries.len() + 1 >= self.capacity
    }

    pub(crate) fn push(&mut self, entry: Instruction) {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
        }
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.entries.last()
    }

    /// Whether the last entry halted execution.
    pub fn halted(&self) -> bool {
        self.last().is_some_and(Instruction::is_fatal)
    }
}

impl Deref for Trace {
    type Target = [Instruction];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
