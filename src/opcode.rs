//! Opcode abstractions, decoding and the traits the interpreter implements.
use std::convert::TryFrom;

use crate::{definitions::memory, OpcodeError, ProcessError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a nibble
const NIBBLE: u16 = 4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// opcode family `T` from any opcode
    fn t(&self) -> u8;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `NNN` is an address
    fn nnn(&self) -> u16;

    /// this is an opcode extractor for the opcode type `TXKK`
    /// - `X` is a register index
    /// - `KK` is a constant
    fn xkk(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a 4 bit constant or a sub opcode
    fn xyn(&self) -> (usize, usize, u8);

    /// this is an opcode extractor for the opcode type `TXYT`
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xkk(), (0xE, 0xDA));
    /// ```
    fn xkk(&self) -> (usize, u8) {
        (self.x(), (self & OPCODE_MASK_00FF) as u8)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, u8) {
        let (x, y) = self.xy();
        (x, y, (self & OPCODE_MASK_000F) as u8)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xy(), (0xE, 0xD));
    /// ```
    fn xy(&self) -> (usize, usize) {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        (self.x(), ((self & MASK) >> NIBBLE) as usize)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> (2 * NIBBLE)) as usize
    }
}

/// Generates the sub opcode enums of the multiplexed families together with
/// their lookup from the selecting bits.
macro_rules! sub_opcodes {
    ($(#[$meta:meta])* $name:ident : $from:ty { $( $(#[$vmeta:meta])* $key:literal => $variant:ident ),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl TryFrom<$from> for $name {
            type Error = ();

            fn try_from(value: $from) -> Result<Self, Self::Error> {
                match value {
                    $( $key => Ok($name::$variant), )+
                    _ => Err(()),
                }
            }
        }
    };
}

sub_opcodes!(
    /// The register to register operations of the `8XYT` family.
    EightOpcode : u8 {
        /// 8XY0 - Sets VX to the value of VY.
        0x0 => Assign,
        /// 8XY1 - Sets VX to VX or VY.
        0x1 => Or,
        /// 8XY2 - Sets VX to VX and VY.
        0x2 => And,
        /// 8XY3 - Sets VX to VX xor VY.
        0x3 => Xor,
        /// 8XY4 - Adds VY to VX, VF is the carry.
        0x4 => Add,
        /// 8XY5 - Subtracts VY from VX, VF is the "no borrow" flag.
        0x5 => Sub,
        /// 8XY6 - Shifts right by one, VF is the dropped bit.
        0x6 => ShiftRight,
        /// 8XY7 - Sets VX to VY minus VX, VF is the "no borrow" flag.
        0x7 => SubReversed,
        /// 8XYE - Shifts left by one, VF is the dropped bit.
        0xE => ShiftLeft,
    }
);

sub_opcodes!(
    /// The key operations of the `EXTT` family.
    KeyOpcode : u8 {
        /// EX9E - Skips the next instruction if the key stored in VX is pressed.
        0x9E => Pressed,
        /// EXA1 - Skips the next instruction if the key stored in VX isn't pressed.
        0xA1 => NotPressed,
    }
);

sub_opcodes!(
    /// The timer and memory operations of the `FXTT` family.
    MiscOpcode : u8 {
        /// FX07 - Sets VX to the value of the delay timer.
        0x07 => GetDelayTimer,
        /// FX0A - A key press is awaited, and then stored in VX.
        0x0A => AwaitKeyPress,
        /// FX15 - Sets the delay timer to VX.
        0x15 => SetDelayTimer,
        /// FX18 - Sets the sound timer to VX.
        0x18 => SetSoundTimer,
        /// FX1E - Adds VX to I. VF is not affected.
        0x1E => AddVxToI,
        /// FX29 - Sets I to the location of the font sprite for the digit in VX.
        0x29 => SetIToSprite,
        /// FX33 - Stores the binary-coded decimal representation of VX at I.
        0x33 => StoreBCD,
        /// FX55 - Stores V0 to VX (including VX) in memory starting at address I.
        0x55 => StoreV0ToVx,
        /// FX65 - Fills V0 to VX (including VX) with values from memory starting at address I.
        0x65 => FillV0ToVx,
    }
);

/// The full and closed set of instructions understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `0NNN` - Calls a machine code routine, not supported and treated as a no-op.
    Sys { nnn: u16 },
    /// `00E0` - Clears the screen.
    Clear,
    /// `00EE` - Returns from a subroutine.
    Return,
    /// `1NNN` - Jumps to address `NNN`.
    Jump { nnn: u16 },
    /// `2NNN` - Calls subroutine at `NNN`.
    Call { nnn: u16 },
    /// `3XKK` - Skips the next instruction if `VX` equals `KK`.
    SkipIfEqual { x: usize, kk: u8 },
    /// `4XKK` - Skips the next instruction if `VX` doesn't equal `KK`.
    SkipIfNotEqual { x: usize, kk: u8 },
    /// `5XY0` - Skips the next instruction if `VX` equals `VY`.
    SkipIfRegistersEqual { x: usize, y: usize },
    /// `6XKK` - Sets `VX` to `KK`.
    Load { x: usize, kk: u8 },
    /// `7XKK` - Adds `KK` to `VX`, the carry flag is not changed.
    Add { x: usize, kk: u8 },
    /// `8XYT` - Register to register operations.
    Eight { ops: EightOpcode, x: usize, y: usize },
    /// `9XY0` - Skips the next instruction if `VX` doesn't equal `VY`.
    SkipIfRegistersNotEqual { x: usize, y: usize },
    /// `ANNN` - Sets `I` to the address `NNN`.
    SetIndex { nnn: u16 },
    /// `BNNN` - Jumps to the address `NNN` plus `V0`.
    JumpWithOffset { nnn: u16 },
    /// `CXKK` - Sets `VX` to a random byte and `KK`.
    Random { x: usize, kk: u8 },
    /// `DXYN` - Draws a sprite of height `N` at coordinate `(VX, VY)`.
    Draw { x: usize, y: usize, n: u8 },
    /// `EXTT` - Keyboard skips.
    Key { ops: KeyOpcode, x: usize },
    /// `FXTT` - Timer and memory operations.
    Misc { ops: MiscOpcode, x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let unknown = |_| OpcodeError::Unknown(value);

        let (x, y, n) = value.xyn();
        let (_, kk) = value.xkk();
        let nnn = value.nnn();

        let instruction = match value.t() {
            0x0 => match value {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                _ => Instruction::Sys { nnn },
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipIfEqual { x, kk },
            0x4 => Instruction::SkipIfNotEqual { x, kk },
            0x5 if n == 0 => Instruction::SkipIfRegistersEqual { x, y },
            0x6 => Instruction::Load { x, kk },
            0x7 => Instruction::Add { x, kk },
            0x8 => Instruction::Eight {
                ops: EightOpcode::try_from(n).map_err(unknown)?,
                x,
                y,
            },
            0x9 if n == 0 => Instruction::SkipIfRegistersNotEqual { x, y },
            0xA => Instruction::SetIndex { nnn },
            0xB => Instruction::JumpWithOffset { nnn },
            0xC => Instruction::Random { x, kk },
            0xD => Instruction::Draw { x, y, n },
            0xE => Instruction::Key {
                ops: KeyOpcode::try_from(kk).map_err(unknown)?,
                x,
            },
            0xF => Instruction::Misc {
                ops: MiscOpcode::try_from(kk).map_err(unknown)?,
                x,
            },
            _ => return Err(OpcodeError::Unknown(value)),
        };
        Ok(instruction)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents the moves the program counter takes after an instruction.
/// The counter has already been moved past the instruction during the fetch.
pub enum ProgramCounterStep {
    /// Continue with the following instruction
    Next,
    /// Skip the following instruction
    Skip,
    /// Set the program counter to the given location
    Jump(u16),
    /// Stay on the current instruction
    Hold,
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Applies the step to a program counter that already points past the
    /// current instruction.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next.apply(0x202), 0x202);
    /// assert_eq!(ProgramCounterStep::Skip.apply(0x202), 0x204);
    /// assert_eq!(ProgramCounterStep::Hold.apply(0x202), 0x200);
    /// assert_eq!(ProgramCounterStep::Jump(0x1234).apply(0x202), 0x234);
    /// ```
    #[inline]
    pub fn apply(&self, pc: u16) -> u16 {
        let pc = match *self {
            ProgramCounterStep::Next => pc,
            ProgramCounterStep::Skip => pc.wrapping_add(memory::opcodes::SIZE),
            ProgramCounterStep::Hold => pc.wrapping_sub(memory::opcodes::SIZE),
            ProgramCounterStep::Jump(pointer) => pointer,
        };
        pc & memory::ADDRESS_MASK
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter by a step.
    fn advance(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a hint from the interpreter up to the host.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The interpreter waits for the next key press
    Wait,
    /// The framebuffer changed and should be redrawn
    Draw,
}

/// These are the handlers that have to be full filled for a working
/// instruction table. `calc` is the single dispatcher over the closed
/// [`Instruction`] set.
pub trait ChipOpcodes: ProgramCounter {
    /// will run a single decoded instruction and move the program counter
    /// accordingly.
    fn calc(&mut self, instruction: Instruction) -> Result<Operation, ProcessError> {
        let next = |step| (step, Operation::None);

        let (step, operation) = match instruction {
            Instruction::Sys { .. } => next(ProgramCounterStep::Next),
            Instruction::Clear => self.clear()?,
            Instruction::Return => next(self.ret()?),
            Instruction::Jump { nnn } => next(ProgramCounterStep::Jump(nnn)),
            Instruction::Call { nnn } => next(self.call(nnn)?),
            Instruction::SkipIfEqual { x, kk } => next(self.skip_if(x, kk, true)),
            Instruction::SkipIfNotEqual { x, kk } => next(self.skip_if(x, kk, false)),
            Instruction::SkipIfRegistersEqual { x, y } => {
                next(self.skip_if_registers(x, y, true))
            }
            Instruction::SkipIfRegistersNotEqual { x, y } => {
                next(self.skip_if_registers(x, y, false))
            }
            Instruction::Load { x, kk } => next(self.load(x, kk)),
            Instruction::Add { x, kk } => next(self.add(x, kk)),
            Instruction::Eight { ops, x, y } => next(self.eight(ops, x, y)),
            Instruction::SetIndex { nnn } => next(self.set_index(nnn)),
            Instruction::JumpWithOffset { nnn } => next(self.jump_with_offset(nnn)),
            Instruction::Random { x, kk } => next(self.random(x, kk)),
            Instruction::Draw { x, y, n } => self.draw(x, y, n),
            Instruction::Key { ops, x } => next(self.key(ops, x)),
            Instruction::Misc { ops, x } => self.misc(ops, x),
        };

        self.advance(step);
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    fn clear(&mut self) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    ///
    /// Returns [`StackError::Underflow`](crate::StackError::Underflow) on an empty stack.
    fn ret(&mut self) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    ///
    /// Returns [`StackError::Overflow`](crate::StackError::Overflow) on a full stack.
    fn call(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XKK` / `4XKK` - Cond - `if(Vx==KK)` / `if(Vx!=KK)`
    fn skip_if(&self, x: usize, kk: u8, equal: bool) -> ProgramCounterStep;

    /// - `5XY0` / `9XY0` - Cond - `if(Vx==Vy)` / `if(Vx!=Vy)`
    fn skip_if_registers(&self, x: usize, y: usize, equal: bool) -> ProgramCounterStep;

    /// - `6XKK` - Const    - `Vx = KK`
    fn load(&mut self, x: usize, kk: u8) -> ProgramCounterStep;

    /// - `7XKK` - Const    - `Vx += KK`            - Carry flag is not changed.
    fn add(&mut self, x: usize, kk: u8) -> ProgramCounterStep;

    /// A mutiuse opcode base for type `8XYT` (T is a sub opcode)
    ///
    /// - `8XY0` - Assign   - `Vx=Vy`
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`
    /// - `8XY4` - Math     - `Vx += Vy`            - `VF` is set to `1` when there's a carry.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VF` is set to `0` when there's a borrow.
    /// - `8XY6` - BitOp    - `Vx>>=1`              - `VF` holds the dropped least significant bit.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - `VF` is set to `0` when there's a borrow.
    /// - `8XYE` - BitOp    - `Vx<<=1`              - `VF` holds the dropped most significant bit.
    fn eight(&mut self, ops: EightOpcode, x: usize, y: usize) -> ProgramCounterStep;

    /// - `ANNN` - MEM      - `I = NNN`
    fn set_index(&mut self, nnn: u16) -> ProgramCounterStep;

    /// - `BNNN` - Flow     - `PC=V0+NNN`
    fn jump_with_offset(&self, nnn: u16) -> ProgramCounterStep;

    /// - `CXKK` - Rand     - `Vx=rand()&KK`
    fn random(&mut self, x: usize, kk: u8) -> ProgramCounterStep;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Draws a `8xN` sprite from `I`, `VF` is set on collision.
    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: u8,
    ) -> (ProgramCounterStep, Operation);

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`
    fn key(&self, ops: KeyOpcode, x: usize) -> ProgramCounterStep;

    /// A multiuse opcode base for type `FXTT` (T is a sub opcode)
    ///
    /// - `FX07` - Timer    - `Vx = get_delay()`
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - Blocking until the next key press.
    /// - `FX15` - Timer    - `delay_timer(Vx)`
    /// - `FX18` - Sound    - `sound_timer(Vx)`
    /// - `FX1E` - MEM      - `I +=Vx`
    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`
    /// - `FX33` - BCD      - `246 => 2, 4, 6`
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`
    fn misc(&mut self, ops: MiscOpcode, x: usize) -> (ProgramCounterStep, Operation);
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let conv = value.try_into();
        assert_eq!(conv, Ok(Instruction::Clear));
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x8128;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Err(OpcodeError::Unknown(value)));
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        let tests = [
            (0x00E0, Ok(Instruction::Clear)),
            (0x00EE, Ok(Instruction::Return)),
            (0x0123, Ok(Instruction::Sys { nnn: 0x123 })),
            (0x1919, Ok(Instruction::Jump { nnn: 0x919 })),
            (0x2222, Ok(Instruction::Call { nnn: 0x222 })),
            (0x3123, Ok(Instruction::SkipIfEqual { x: 0x1, kk: 0x23 })),
            (0x4123, Ok(Instruction::SkipIfNotEqual { x: 0x1, kk: 0x23 })),
            (0x5120, Ok(Instruction::SkipIfRegistersEqual { x: 0x1, y: 0x2 })),
            (0x5121, Err(())),
            (0x6123, Ok(Instruction::Load { x: 0x1, kk: 0x23 })),
            (0x7123, Ok(Instruction::Add { x: 0x1, kk: 0x23 })),
            (
                0x8120,
                Ok(Instruction::Eight {
                    ops: EightOpcode::Assign,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8124,
                Ok(Instruction::Eight {
                    ops: EightOpcode::Add,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x812E,
                Ok(Instruction::Eight {
                    ops: EightOpcode::ShiftLeft,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (0x8128, Err(())),
            (0x9120, Ok(Instruction::SkipIfRegistersNotEqual { x: 0x1, y: 0x2 })),
            (0x9121, Err(())),
            (0xA222, Ok(Instruction::SetIndex { nnn: 0x222 })),
            (0xB222, Ok(Instruction::JumpWithOffset { nnn: 0x222 })),
            (0xC123, Ok(Instruction::Random { x: 0x1, kk: 0x23 })),
            (0xD123, Ok(Instruction::Draw { x: 0x1, y: 0x2, n: 0x3 })),
            (
                0xE19E,
                Ok(Instruction::Key {
                    ops: KeyOpcode::Pressed,
                    x: 0x1,
                }),
            ),
            (
                0xE1A1,
                Ok(Instruction::Key {
                    ops: KeyOpcode::NotPressed,
                    x: 0x1,
                }),
            ),
            (0xE111, Err(())),
            (
                0xF00A,
                Ok(Instruction::Misc {
                    ops: MiscOpcode::AwaitKeyPress,
                    x: 0x0,
                }),
            ),
            (
                0xF533,
                Ok(Instruction::Misc {
                    ops: MiscOpcode::StoreBCD,
                    x: 0x5,
                }),
            ),
            (
                0xFE65,
                Ok(Instruction::Misc {
                    ops: MiscOpcode::FillV0ToVx,
                    x: 0xE,
                }),
            ),
            (0xF0AA, Err(())),
        ];
        for (value, res) in tests.iter().copied() {
            let conv: Result<Instruction, _> = value.try_into();
            assert_eq!(conv, res.map_err(|_| OpcodeError::Unknown(value)), "{:#06X}", value);
        }
    }

    #[test]
    fn test_every_family_decodes_without_panic() {
        // 0x0000 - 0xFFFF either decode or are reported as unknown
        for value in 0..=u16::MAX {
            let conv: Result<Instruction, OpcodeError> = value.try_into();
            if let Err(err) = conv {
                assert_eq!(err, OpcodeError::Unknown(value));
            }
        }
    }

    #[test]
    fn test_step_wraps_into_memory() {
        assert_eq!(ProgramCounterStep::Skip.apply(0xFFE), 0x000);
        assert_eq!(ProgramCounterStep::Jump(0x10FE).apply(0x202), 0x0FE);
    }
}
