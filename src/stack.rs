use tinyvec::ArrayVec;

use crate::{definitions::cpu, StackError};

/// The stack is only used to store return addresses when subroutines are called. The
/// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
/// `12` levels of nesting; modern implementations usually have more.
/// (here we are using `16`)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallStack {
    entries: ArrayVec<[u16; cpu::stack::SIZE]>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will push the pointer to the stack, a full stack is left untouched.
    pub fn push(&mut self, pointer: u16) -> Result<(), StackError> {
        // try_push hands the value back if there is no capacity left
        match self.entries.try_push(pointer) {
            None => Ok(()),
            Some(_) => Err(StackError::Overflow),
        }
    }

    /// Will pop the last pushed pointer.
    pub fn pop(&mut self) -> Result<u16, StackError> {
        self.entries.pop().ok_or(StackError::Underflow)
    }

    /// The stack pointer, the amount of occupied slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The occupied slots, oldest first.
    pub fn as_slice(&self) -> &[u16] {
        self.entries.as_slice()
    }
}
