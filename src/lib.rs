//! A CHIP-8 interpreter core. The [`ChipSet`](chip8::ChipSet) executes one
//! instruction per [`step`](chip8::ChipSet::step), the [`Runner`] paces it
//! against wall clock time and forwards its output to the host devices.
pub mod chip8;
pub mod config;
pub mod definitions;
pub mod devices;
pub mod display;
pub mod memory;
pub mod opcode;
pub mod registers;
pub mod stack;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
