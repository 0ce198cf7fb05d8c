use thiserror::Error;

use crate::opcode::Opcode;

/// Diagnostics raised while executing a single cycle. None of them leave the
/// machine in a broken state, the faulting instruction simply had no effect.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    Unknown(Opcode),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Overflow,
    #[error("Stack is empty!")]
    Underflow,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoadError {
    #[error("The rom is too large with {len} bytes, there is only space for {max} bytes.")]
    RomTooLarge { len: usize, max: usize },
}
