use crate::{
    definitions::{display, display::fontset},
    opcode::{ChipOpcodes, EightOpcode, KeyOpcode, MiscOpcode, Operation, ProgramCounterStep},
    ProcessError,
};

use super::ChipSet;

/// The largest sprite `DXYN` can draw.
const MAX_SPRITE_HEIGHT: usize = 0xF;

impl ChipOpcodes for ChipSet {
    fn clear(&mut self) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        self.display.clear();
        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn ret(&mut self) -> Result<ProgramCounterStep, ProcessError> {
        let pc = self.stack.pop()?;
        log::debug!("return to {:#06X}", pc);
        Ok(ProgramCounterStep::Jump(pc))
    }

    fn call(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError> {
        // the counter already points to the instruction after the call
        self.stack.push(self.registers.pc)?;
        log::debug!("call {:#06X}, depth {}", nnn, self.stack.len());
        Ok(ProgramCounterStep::Jump(nnn))
    }

    fn skip_if(&self, x: usize, kk: u8, equal: bool) -> ProgramCounterStep {
        ProgramCounterStep::cond((self.registers.v[x] == kk) == equal)
    }

    fn skip_if_registers(&self, x: usize, y: usize, equal: bool) -> ProgramCounterStep {
        ProgramCounterStep::cond((self.registers.v[x] == self.registers.v[y]) == equal)
    }

    fn load(&mut self, x: usize, kk: u8) -> ProgramCounterStep {
        self.registers.v[x] = kk;
        ProgramCounterStep::Next
    }

    fn add(&mut self, x: usize, kk: u8) -> ProgramCounterStep {
        // let VX overflow, but ignore carry
        self.registers.v[x] = self.registers.v[x].wrapping_add(kk);
        ProgramCounterStep::Next
    }

    fn eight(&mut self, ops: EightOpcode, x: usize, y: usize) -> ProgramCounterStep {
        let vx = self.registers.v[x];
        let vy = self.registers.v[y];
        let shifted = if self.quirks.shift_uses_vy { vy } else { vx };

        // both halves are computed from the values before the instruction,
        // VF is written first so a result targeting VF wins
        let (result, flag) = match ops {
            EightOpcode::Assign => (vy, None),
            EightOpcode::Or => (vx | vy, None),
            EightOpcode::And => (vx & vy, None),
            EightOpcode::Xor => (vx ^ vy, None),
            EightOpcode::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry))
            }
            EightOpcode::Sub => (vx.wrapping_sub(vy), Some(vx >= vy)),
            EightOpcode::ShiftRight => (shifted >> 1, Some(shifted & 0x01 == 0x01)),
            EightOpcode::SubReversed => (vy.wrapping_sub(vx), Some(vy >= vx)),
            EightOpcode::ShiftLeft => (shifted << 1, Some(shifted & 0x80 == 0x80)),
        };

        if let Some(flag) = flag {
            self.registers.set_flag(flag);
        }
        self.registers.v[x] = result;
        ProgramCounterStep::Next
    }

    fn set_index(&mut self, nnn: u16) -> ProgramCounterStep {
        self.registers.index = nnn;
        ProgramCounterStep::Next
    }

    fn jump_with_offset(&self, nnn: u16) -> ProgramCounterStep {
        ProgramCounterStep::Jump(nnn + self.registers.v[0] as u16)
    }

    fn random(&mut self, x: usize, kk: u8) -> ProgramCounterStep {
        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand = [0u8; 1];
        self.rng.fill_bytes(&mut rand);
        self.registers.v[x] = rand[0] & kk;
        ProgramCounterStep::Next
    }

    fn draw(&mut self, x: usize, y: usize, n: u8) -> (ProgramCounterStep, Operation) {
        // see https://tobiasvl.github.io/blog/write-a-chip-8-emulator/
        let coorx = self.registers.v[x] as usize % display::WIDTH;
        let coory = self.registers.v[y] as usize % display::HEIGHT;

        let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
        let sprite = &mut sprite[..n as usize];
        self.memory
            .read_slice(self.registers.index as usize, sprite);

        let collision = self.display.draw_sprite(coorx, coory, sprite);
        self.registers.set_flag(collision);

        (ProgramCounterStep::Next, Operation::Draw)
    }

    fn key(&self, ops: KeyOpcode, x: usize) -> ProgramCounterStep {
        let pressed = self.keyboard.is_pressed(self.registers.v[x] as usize);
        match ops {
            KeyOpcode::Pressed => ProgramCounterStep::cond(pressed),
            KeyOpcode::NotPressed => ProgramCounterStep::cond(!pressed),
        }
    }

    fn misc(&mut self, ops: MiscOpcode, x: usize) -> (ProgramCounterStep, Operation) {
        let vx = self.registers.v[x];
        let index = self.registers.index as usize;

        match ops {
            MiscOpcode::GetDelayTimer => {
                self.registers.v[x] = self.registers.delay.get_value();
            }
            MiscOpcode::AwaitKeyPress => {
                log::debug!("waiting for a key press into V{:X}", x);
                // only presses from now on count
                self.keyboard.clear_pressed();
                self.awaiting_key = Some(x);
                return (ProgramCounterStep::Hold, Operation::Wait);
            }
            MiscOpcode::SetDelayTimer => {
                self.registers.delay.set_value(vx);
            }
            MiscOpcode::SetSoundTimer => {
                self.registers.sound.set_value(vx);
            }
            MiscOpcode::AddVxToI => {
                self.registers.index = self.registers.index.wrapping_add(vx as u16);
            }
            MiscOpcode::SetIToSprite => {
                let digit = (vx & 0xF) as usize;
                self.registers.index = (fontset::LOCATION + fontset::GLYPH_SIZE * digit) as u16;
            }
            MiscOpcode::StoreBCD => {
                self.memory.write_slice(index, &[vx / 100, vx / 10 % 10, vx % 10]);
            }
            MiscOpcode::StoreV0ToVx => {
                self.memory.write_slice(index, &self.registers.v[..=x]);
                self.increment_index_after_load_store(x);
            }
            MiscOpcode::FillV0ToVx => {
                self.memory.read_slice(index, &mut self.registers.v[..=x]);
                self.increment_index_after_load_store(x);
            }
        }
        (ProgramCounterStep::Next, Operation::None)
    }
}

impl ChipSet {
    fn increment_index_after_load_store(&mut self, x: usize) {
        if self.quirks.load_store_increments_index {
            self.registers.index = self.registers.index.wrapping_add(x as u16 + 1);
        }
    }
}
