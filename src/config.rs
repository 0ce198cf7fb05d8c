//! Runtime configuration of the interpreter and the runner.
use crate::definitions::{cpu, timer};

/// Behaviors that differ between historical interpreters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// `8XY6` and `8XYE` shift `VY` into `VX` (COSMAC VIP) instead of shifting
    /// `VX` in place.
    pub shift_uses_vy: bool,
    /// `FX55` and `FX65` leave `I` at `I + X + 1` (COSMAC VIP) instead of
    /// leaving it unmodified.
    pub load_store_increments_index: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Instructions executed per second by the runner.
    pub cpu_hertz: u32,
    /// Timer decrements per second by the runner.
    pub timer_hertz: u32,
    /// Upper bound of instructions a single runner update executes.
    pub max_cycles_per_update: u32,
    /// Return the first diagnostic from the runner instead of logging it.
    pub halt_on_error: bool,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_hertz: cpu::HERTZ,
            timer_hertz: timer::HERTZ,
            max_cycles_per_update: cpu::HERTZ / 10,
            halt_on_error: false,
            quirks: Quirks::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cpu_hertz(mut self, hertz: u32) -> Self {
        self.cpu_hertz = hertz;
        self
    }

    pub fn with_timer_hertz(mut self, hertz: u32) -> Self {
        self.timer_hertz = hertz;
        self
    }

    pub fn with_max_cycles_per_update(mut self, cycles: u32) -> Self {
        self.max_cycles_per_update = cycles;
        self
    }

    pub fn with_halt_on_error(mut self, halt: bool) -> Self {
        self.halt_on_error = halt;
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let quirks = Quirks {
            shift_uses_vy: true,
            ..Quirks::default()
        };
        let config = Config::new()
            .with_cpu_hertz(700)
            .with_halt_on_error(true)
            .with_quirks(quirks);

        assert_eq!(config.cpu_hertz, 700);
        assert_eq!(config.timer_hertz, 60);
        assert!(config.halt_on_error);
        assert!(config.quirks.shift_uses_vy);
        assert!(!config.quirks.load_store_increments_index);
    }
}
