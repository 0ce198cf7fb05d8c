//! The ram of the chip.
use crate::{
    definitions::{cpu, display::fontset, memory},
    opcode::Opcode,
    LoadError,
};

/// - `0x000-0x1FF` - Chip 8 interpreter (contains font set in emu)
/// - `0x050-0x0A0` - Used for the built in `4x5` pixel font set (`0-F`)
/// - `0x200-0xFFF` - Program ROM and work RAM
///
/// Every access is masked into the `0x000-0xFFF` range, so index arithmetic
/// running over the end wraps around to the start of the ram.
#[derive(Clone)]
pub struct Memory {
    data: Box<[u8; memory::SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Will create the ram with the fontset loaded.
    pub fn new() -> Self {
        let mut data = Box::new([0; memory::SIZE]);
        data[fontset::LOCATION..(fontset::LOCATION + fontset::FONTSET.len())]
            .copy_from_slice(&fontset::FONTSET);
        Self { data }
    }

    #[inline]
    fn wrap(address: usize) -> usize {
        address & memory::ADDRESS_MASK as usize
    }

    /// Will write the rom into the program area, the rest of the program
    /// area is zeroed.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > cpu::PROGRAM_SIZE {
            return Err(LoadError::RomTooLarge {
                len: rom.len(),
                max: cpu::PROGRAM_SIZE,
            });
        }

        let program = &mut self.data[cpu::PROGRAM_COUNTER..];
        program.fill(0);
        program[..rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Builds the big-endian opcode at the given address.
    pub fn opcode(&self, address: u16) -> Opcode {
        let address = address as usize;
        Opcode::from_be_bytes([self.read(address), self.read(address + 1)])
    }

    pub fn read(&self, address: usize) -> u8 {
        self.data[Self::wrap(address)]
    }

    pub fn write(&mut self, address: usize, value: u8) {
        self.data[Self::wrap(address)] = value;
    }

    /// Will write the slice starting at the given address.
    pub fn write_slice(&mut self, address: usize, data: &[u8]) {
        for (offset, value) in data.iter().enumerate() {
            self.write(address + offset, *value);
        }
    }

    /// Will fill the slice from the memory starting at the given address.
    pub fn read_slice(&self, address: usize, data: &mut [u8]) {
        for (offset, value) in data.iter_mut().enumerate() {
            *value = self.read(address + offset);
        }
    }

    /// The raw view of the whole ram.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }
}
