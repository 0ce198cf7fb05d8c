use std::time::Duration;

use crate::{
    chip8::ChipSet,
    config::Config,
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
    opcode::Operation,
    timer::Clock,
    LoadError, ProcessError,
};

/// Drives a [`ChipSet`] from the host loop. Every [`update`](Runner::update)
/// polls the keyboard, runs the instructions that are due for the elapsed time,
/// ticks the timers at their own rate and forwards screen and beeper changes.
pub struct Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    chip: ChipSet,
    display: D,
    keyboard: K,
    sound: S,
    config: Config,
    cpu_clock: Clock,
    timer_clock: Clock,
    beeping: bool,
}

impl<D, K, S> Runner<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    pub fn new(display: D, keyboard: K, sound: S, config: Config) -> Self {
        Self {
            chip: ChipSet::with_quirks(config.quirks),
            display,
            keyboard,
            sound,
            cpu_clock: Clock::new(config.cpu_hertz),
            timer_clock: Clock::new(config.timer_hertz),
            config,
            beeping: false,
        }
    }

    /// Will load the rom into a freshly reset chip and clear the host screen.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        self.chip.load(rom)?;
        self.cpu_clock.reset();
        self.timer_clock.reset();
        self.display.clear_display();
        self.set_beep(false);
        Ok(())
    }

    /// Advances the machine by the given wall clock time.
    ///
    /// Diagnostics of single instructions are logged and execution continues,
    /// unless [`Config::halt_on_error`] is set, in which case the first one is
    /// returned and the rest of the update is skipped.
    pub fn update(&mut self, elapsed: Duration) -> Result<(), ProcessError> {
        let keys = self.keyboard.keyboard();
        self.chip.set_keyboard(&keys);

        let due = self.cpu_clock.advance(elapsed);
        let cycles = due.min(self.config.max_cycles_per_update);
        if cycles < due {
            log::debug!("Dropping {} cycles to catch up", due - cycles);
        }

        for _ in 0..cycles {
            match self.chip.step() {
                Ok(Operation::None) => {}
                Ok(Operation::Draw) => self.display.display(self.chip.framebuffer_snapshot()),
                // nothing will change until the keyboard is polled again
                Ok(Operation::Wait) => break,
                Err(err) if self.config.halt_on_error => return Err(err),
                Err(err) => log::warn!("{}", err),
            }
        }

        // more ticks than a timer can count down change nothing
        let ticks = self.timer_clock.advance(elapsed).min(u32::from(u8::MAX));
        for _ in 0..ticks {
            self.chip.tick_timers();
        }
        self.set_beep(self.chip.is_sound_active());

        Ok(())
    }

    /// Only forwards changes of the beeper state.
    fn set_beep(&mut self, active: bool) {
        if active == self.beeping {
            return;
        }
        self.beeping = active;
        if active {
            self.sound.start_beep();
        } else {
            self.sound.stop_beep();
        }
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
