use chip::{
    chip8::ChipSet,
    definitions::{cpu, display::fontset},
    opcode::Operation,
    LoadError, ProcessError, StackError,
};

fn load(rom: &[u8]) -> ChipSet {
    let mut chip = ChipSet::new();
    chip.load(rom).expect("the rom fits into memory");
    chip
}

fn lit_row(chip: &ChipSet, y: usize) -> u8 {
    (0..8).fold(0, |acc, x| acc << 1 | chip.framebuffer_snapshot().get(x, y) as u8)
}

#[test]
fn clear_screen() {
    let mut chip = load(&[0x00, 0xE0]);

    assert_eq!(Ok(Operation::Draw), chip.step());
    assert_eq!(chip.framebuffer_snapshot().count_lit(), 0);
    assert_eq!(chip.program_counter(), 0x202);
}

#[test]
fn add_registers() {
    let mut chip = load(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]);

    for _ in 0..3 {
        assert_eq!(Ok(Operation::None), chip.step());
    }
    assert_eq!(chip.registers()[0x0], 8);
    assert_eq!(chip.registers()[0xF], 0);
    assert_eq!(chip.program_counter(), 0x206);
}

#[test]
fn draw_font_glyph() {
    let mut chip = load(&[0xA0, 0x50, 0xD0, 0x05]);

    assert_eq!(Ok(Operation::None), chip.step());
    assert_eq!(Ok(Operation::Draw), chip.step());
    assert_eq!(chip.registers()[0xF], 0);
    for y in 0..fontset::GLYPH_SIZE {
        assert_eq!(lit_row(&chip, y), fontset::FONTSET[y]);
    }
    assert_eq!(chip.framebuffer_snapshot().count_lit(), 14);
}

#[test]
fn call_and_return() {
    // call 0x206; V0 = 1; nop; V1 = 2; return
    let mut chip = load(&[0x22, 0x06, 0x60, 0x01, 0x00, 0x00, 0x61, 0x02, 0x00, 0xEE]);

    assert_eq!(Ok(Operation::None), chip.step());
    assert_eq!(chip.program_counter(), 0x206);
    assert_eq!(chip.stack_depth(), 1);

    assert_eq!(Ok(Operation::None), chip.step());
    assert_eq!(Ok(Operation::None), chip.step());
    assert_eq!(chip.program_counter(), 0x202);
    assert_eq!(chip.stack_depth(), 0);
    assert_eq!(chip.registers()[0x1], 2);
}

#[test]
fn stack_overflow() {
    let mut chip = load(&[0x22, 0x00]);

    for _ in 0..cpu::stack::SIZE {
        assert!(chip.step().is_ok());
    }
    assert_eq!(Err(ProcessError::Stack(StackError::Overflow)), chip.step());
    assert_eq!(chip.stack_depth(), cpu::stack::SIZE);
}

#[test]
fn wait_for_key() {
    let mut chip = load(&[0xF2, 0x0A]);

    assert_eq!(Ok(Operation::Wait), chip.step());
    for _ in 0..5 {
        assert_eq!(Ok(Operation::Wait), chip.step());
        assert_eq!(chip.program_counter(), 0x200);
    }

    chip.set_input(0xC, true);
    assert!(chip.get_keyboard()[0xC]);
    assert_eq!(Ok(Operation::None), chip.step());
    assert_eq!(chip.registers()[0x2], 0xC);
    assert_eq!(chip.program_counter(), 0x202);

    chip.toggle_key(0xC);
    assert!(chip.get_keyboard().iter().all(|key| !key));
}

#[test]
fn store_bcd_and_registers() {
    // V0 = 137; I = 0x300; BCD of V0; store V0 to V2 at I
    let mut chip = load(&[0x60, 0x89, 0xA3, 0x00, 0xF0, 0x33, 0xF0, 0x55]);
    for _ in 0..3 {
        chip.step().expect("valid opcode");
    }
    assert_eq!(chip.index_register(), 0x300);
    assert_eq!(&chip.memory()[0x300..0x303], &[1, 3, 7]);

    chip.step().expect("valid opcode");
    assert_eq!(&chip.memory()[0x300..0x303], &[0x89, 3, 7]);
    assert_eq!(
        &chip.memory()[cpu::PROGRAM_COUNTER..cpu::PROGRAM_COUNTER + 2],
        &[0x60, 0x89]
    );
}

#[test]
fn sound_timer() {
    // V0 = 3; sound = V0
    let mut chip = load(&[0x60, 0x03, 0xF0, 0x18]);
    assert!(!chip.is_sound_active());

    chip.step().expect("valid opcode");
    chip.step().expect("valid opcode");
    assert!(chip.is_sound_active());

    for _ in 0..3 {
        chip.tick_timers();
    }
    assert!(!chip.is_sound_active());
}

#[test]
fn rom_too_large() {
    let mut chip = ChipSet::new();
    let rom = vec![0; cpu::PROGRAM_SIZE + 1];
    assert_eq!(
        Err(LoadError::RomTooLarge {
            len: rom.len(),
            max: cpu::PROGRAM_SIZE
        }),
        chip.load(&rom)
    );

    // still usable afterwards
    assert_eq!(Ok(()), chip.load(&[0x00, 0xE0]));
    assert_eq!(Ok(Operation::Draw), chip.step());
}

#[test]
fn reset_restarts_the_rom() {
    let mut chip = load(&[0x70, 0x01, 0x12, 0x00]);
    for _ in 0..10 {
        chip.step().expect("valid opcode");
    }
    assert_eq!(chip.registers()[0x0], 5);

    chip.reset();
    assert_eq!(chip.registers()[0x0], 0);
    assert_eq!(chip.program_counter(), 0x200);
    chip.step().expect("valid opcode");
    assert_eq!(chip.registers()[0x0], 1);
}
