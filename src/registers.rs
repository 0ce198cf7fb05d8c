use crate::{definitions::cpu, timer::Timer};

/// The register state of the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub v: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub index: u16,
    /// The program counter has the address of the next instruction to be
    /// executed from memory.
    pub pc: u16,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub delay: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    pub sound: Timer,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            v: [0; cpu::register::SIZE],
            index: 0,
            pc: cpu::PROGRAM_COUNTER as u16,
            delay: Timer::default(),
            sound: Timer::default(),
        }
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the flag register `VF`.
    #[inline]
    pub fn set_flag(&mut self, flag: bool) {
        self.v[cpu::register::LAST] = flag as u8;
    }

    #[inline]
    pub fn flag(&self) -> u8 {
        self.v[cpu::register::LAST]
    }

    /// Decrements both timers.
    pub fn tick_timers(&mut self) {
        self.delay.tick();
        self.sound.tick();
    }
}
