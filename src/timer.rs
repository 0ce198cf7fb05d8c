use std::{convert::TryFrom, time::Duration};

/// The shortest interval a [`Clock`] runs at.
const MIN_INTERVAL: Duration = Duration::from_nanos(1);

/// Represents a timer inside of the chip infrastructure, it will count down
/// to zero from what ever number given, once per [`tick`](Timer::tick).
/// The host is responsible for ticking it at 60Hz.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Counts down by one, stays at zero.
    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

/// Turns elapsed real time into a count of fixed length cycles.
///
/// The remainder of an update that does not fill a whole cycle is kept and
/// counted towards the next update.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    interval: Duration,
    elapsed: Duration,
}

impl Clock {
    /// Will create a clock running at the given hertz, `0` is treated as `1`.
    /// The interval never drops below a nanosecond.
    pub fn new(hertz: u32) -> Self {
        Self {
            interval: (Duration::from_secs(1) / hertz.max(1)).max(MIN_INTERVAL),
            elapsed: Duration::from_secs(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Will add the elapsed time and return how many cycles are due.
    ///
    /// The count saturates at `u32::MAX`.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let elapsed = self.elapsed.saturating_add(delta).as_nanos();
        let interval = self.interval.as_nanos();

        // the remainder is smaller than the interval, which is at most a second
        self.elapsed = Duration::from_nanos((elapsed % interval) as u64);
        u32::try_from(elapsed / interval).unwrap_or(u32::MAX)
    }

    /// Drops the partial cycle.
    pub fn reset(&mut self) {
        self.elapsed = Duration::from_secs(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::timer;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(2);
        assert!(timer.is_active());
        timer.tick();
        assert_eq!(timer.get_value(), 1);
        timer.tick();
        timer.tick();
        assert_eq!(timer.get_value(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_timer_reaches_zero_in_a_second() {
        let mut timer = Timer::new(timer::HERTZ as u8);
        let mut clock = Clock::new(timer::HERTZ);

        for _ in 0..clock.advance(Duration::from_secs(1)) {
            timer.tick();
        }
        assert_eq!(timer.get_value(), 0);
    }

    #[test]
    fn test_clock_keeps_remainder() {
        let mut clock = Clock::new(100);
        assert_eq!(clock.interval(), Duration::from_millis(10));
        assert_eq!(clock.advance(Duration::from_millis(15)), 1);
        assert_eq!(clock.advance(Duration::from_millis(5)), 1);
        assert_eq!(clock.advance(Duration::from_millis(9)), 0);
        clock.reset();
        assert_eq!(clock.advance(Duration::from_millis(9)), 0);
    }

    #[test]
    /// rates above a gigahertz still advance
    fn test_clock_high_hertz() {
        let mut clock = Clock::new(2_000_000_000);
        assert_eq!(clock.interval(), Duration::from_nanos(1));
        assert_eq!(clock.advance(Duration::from_millis(1)), 1_000_000);

        let mut clock = Clock::new(u32::MAX);
        assert_eq!(clock.interval(), Duration::from_nanos(1));
        assert_eq!(clock.advance(Duration::from_secs(60 * 60 * 24 * 365)), u32::MAX);
        assert_eq!(clock.advance(Duration::from_nanos(0)), 0);
    }

    #[test]
    /// a long stall is counted at once and keeps its remainder
    fn test_clock_long_elapsed() {
        let mut clock = Clock::new(500);
        let day = Duration::from_secs(60 * 60 * 24);
        assert_eq!(clock.advance(day + Duration::from_millis(3)), 43_200_001);
        assert_eq!(clock.advance(Duration::from_millis(1)), 1);
        assert_eq!(clock.advance(Duration::from_millis(1)), 0);

        assert_eq!(Clock::new(0).advance(Duration::from_secs(3)), 3);
    }
}
