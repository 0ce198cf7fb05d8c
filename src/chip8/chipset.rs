use std::convert::TryFrom;

use {
    crate::{
        config::Quirks,
        definitions::{cpu, keyboard, memory as ram},
        devices::InputState,
        display::Framebuffer,
        memory::Memory,
        opcode::{ChipOpcodes, Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep},
        registers::RegisterFile,
        stack::CallStack,
        LoadError, ProcessError,
    },
    rand::RngCore,
};

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
///
/// The chipset does no timing on its own, the host calls [`step`](ChipSet::step)
/// at the instruction rate and [`tick_timers`](ChipSet::tick_timers) at 60Hz.
pub struct ChipSet {
    /// all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    pub(super) memory: Memory,
    pub(super) registers: RegisterFile,
    pub(super) stack: CallStack,
    pub(super) display: Framebuffer,
    pub(super) keyboard: InputState,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    pub(super) quirks: Quirks,
    /// Set while `FX0A` waits for a key, holds the target register `X`.
    pub(super) awaiting_key: Option<usize>,
    /// The last rom loaded, reused on reset.
    pub(super) rom: Box<[u8]>,
}

impl Default for ChipSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipSet {
    /// will create a new chipset object with an empty program area
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Self {
            opcode: 0,
            memory: Memory::new(),
            registers: RegisterFile::new(),
            stack: CallStack::new(),
            display: Framebuffer::new(),
            keyboard: InputState::new(),
            rng: Box::new(rand::rngs::OsRng),
            quirks,
            awaiting_key: None,
            rom: Box::new([]),
        }
    }

    /// Will replace the random source used by `CXKK`.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    pub fn set_rng(&mut self, rng: Box<dyn RngCore + Send>) {
        self.rng = rng;
    }

    /// Will reset the machine and write the rom into memory at `0x200`.
    ///
    /// A rom larger than the program area is rejected and the machine is
    /// left as it was.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > cpu::PROGRAM_SIZE {
            return Err(LoadError::RomTooLarge {
                len: rom.len(),
                max: cpu::PROGRAM_SIZE,
            });
        }
        log::debug!("Loading a rom of {} bytes", rom.len());
        self.rom = rom.into();
        self.reset();
        Ok(())
    }

    /// Restores the power on state and reloads the last loaded rom.
    pub fn reset(&mut self) {
        log::debug!("Resetting the chipset");
        self.opcode = 0;
        self.memory = Memory::new();
        self.registers = RegisterFile::new();
        self.stack.clear();
        self.display.clear();
        self.keyboard.reset();
        self.awaiting_key = None;
        // the length was checked when the rom was accepted
        if let Err(err) = self.memory.load(&self.rom) {
            log::error!("{}", err);
        }
    }

    /// will get the next opcode from memory and move the program counter past it
    pub(super) fn fetch(&mut self) {
        let pc = self.registers.pc;
        self.opcode = self.memory.opcode(pc);
        self.registers.pc = pc.wrapping_add(ram::opcodes::SIZE) & ram::ADDRESS_MASK;
    }

    /// will advance the program by a single step
    ///
    /// Errors are diagnostics only, the faulting instruction had no effect and
    /// the program counter moved past it.
    pub fn step(&mut self) -> Result<Operation, ProcessError> {
        if let Some(x) = self.awaiting_key {
            return Ok(self.resume_key_wait(x));
        }

        self.fetch();
        log::trace!("opcode {:#06X}", self.opcode);
        let instruction = Instruction::try_from(self.opcode)?;
        log::trace!("instruction {:?}", instruction);
        self.calc(instruction)
    }

    /// Finishes a `FX0A` once a key went down since the wait started.
    fn resume_key_wait(&mut self, x: usize) -> Operation {
        match self.keyboard.take_pressed() {
            Some(key) => {
                log::debug!("Key {:#X} pressed, leaving the wait", key);
                self.registers.v[x] = key;
                self.awaiting_key = None;
                self.registers.pc =
                    self.registers.pc.wrapping_add(ram::opcodes::SIZE) & ram::ADDRESS_MASK;
                Operation::None
            }
            None => Operation::Wait,
        }
    }

    /// Decrements the delay and sound timer, to be called at 60Hz.
    pub fn tick_timers(&mut self) {
        self.registers.tick_timers();
    }

    /// Will set the value of the given key
    pub fn set_input(&mut self, key: usize, pressed: bool) {
        self.keyboard.set_key(key, pressed)
    }

    /// Will write keyboard data into internal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_mult(keys);
    }

    /// Will toggle the given key
    pub fn toggle_key(&mut self, key: usize) {
        self.keyboard.toggle_key(key)
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool] {
        self.keyboard.get_keys()
    }

    /// The screen as of the last instruction.
    pub fn framebuffer_snapshot(&self) -> &Framebuffer {
        &self.display
    }

    /// Whether the host should beep.
    pub fn is_sound_active(&self) -> bool {
        self.registers.sound.is_active()
    }

    pub fn sound_timer(&self) -> u8 {
        self.registers.sound.get_value()
    }

    pub fn delay_timer(&self) -> u8 {
        self.registers.delay.get_value()
    }

    pub fn program_counter(&self) -> u16 {
        self.registers.pc
    }

    pub fn index_register(&self) -> u16 {
        self.registers.index
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers.v[..]
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}

impl ProgramCounter for ChipSet {
    fn advance(&mut self, step: ProgramCounterStep) {
        self.registers.pc = step.apply(self.registers.pc);
    }
}
