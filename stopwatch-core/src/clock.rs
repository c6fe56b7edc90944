use std::cell::Cell;
use std::rc::Rc;

/// Source of monotonic milliseconds.
pub trait TimeSource {
    fn now_ms(&self) -> u64;
}

/// Time source advanced by hand. Clones share the same instant.
#[derive(Clone, Default, Debug)]
pub struct ManualTime {
    now: Rc<Cell<u64>>,
}

impl ManualTime {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

/// Elapsed-time clock anchored on a reference instant.
///
/// While running, `reference_ms` is the instant that corresponds to an
/// elapsed value of zero, so a reading is simply `now - reference`. That
/// makes pause/resume exact no matter how long the pause lasted.
#[derive(Debug, Default)]
pub struct Clock {
    state: RunState,
    accumulated_ms: u64,
    reference_ms: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.state == RunState::Running {
            return;
        }
        self.reference_ms = now_ms.saturating_sub(self.accumulated_ms);
        self.state = RunState::Running;
    }

    /// Stops the clock with `elapsed_ms` as the retained value.
    pub fn freeze(&mut self, elapsed_ms: u64) {
        self.accumulated_ms = elapsed_ms;
        self.state = RunState::Stopped;
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
        self.reference_ms = 0;
        self.state = RunState::Stopped;
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            RunState::Running => now_ms.saturating_sub(self.reference_ms),
            RunState::Stopped => self.accumulated_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_basic() {
        let mut clock = Clock::new();
        assert_eq!(clock.state(), RunState::Stopped);
        assert_eq!(clock.elapsed_ms(0), 0);

        clock.start(1000);
        assert_eq!(clock.state(), RunState::Running);
        assert_eq!(clock.elapsed_ms(1500), 500);
        assert_eq!(clock.elapsed_ms(2000), 1000);

        clock.freeze(clock.elapsed_ms(2000));
        assert_eq!(clock.state(), RunState::Stopped);
        assert_eq!(clock.elapsed_ms(5000), 1000); // Stays at 1000 when stopped

        clock.start(5000);
        assert_eq!(clock.elapsed_ms(5000), 1000);
        assert_eq!(clock.elapsed_ms(5500), 1500);

        clock.reset();
        assert_eq!(clock.state(), RunState::Stopped);
        assert_eq!(clock.elapsed_ms(10_000), 0);
    }

    #[test]
    fn test_start_while_running_keeps_reference() {
        let mut clock = Clock::new();
        clock.start(100);
        clock.start(900);
        assert_eq!(clock.elapsed_ms(1100), 1000);
    }

    #[test]
    fn test_long_pause_is_not_counted() {
        let mut clock = Clock::new();
        clock.start(0);
        clock.freeze(clock.elapsed_ms(750));
        clock.start(3_600_000);
        assert_eq!(clock.elapsed_ms(3_600_000), 750);
        assert_eq!(clock.elapsed_ms(3_600_250), 1000);
    }

    #[test]
    fn test_manual_time_shared_between_clones() {
        let time = ManualTime::new(10);
        let other = time.clone();
        time.advance(15);
        assert_eq!(other.now_ms(), 25);
        other.set(3);
        assert_eq!(time.now_ms(), 3);
    }
}
