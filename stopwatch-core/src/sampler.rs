/// Periodic trigger capability. The host calls back into
/// [`crate::Stopwatch::tick`] once per period while active.
pub trait Ticker {
    fn start(&mut self, period_ms: u64);
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Ticker that only records what was asked of it; tests fire ticks by hand.
#[derive(Debug, Default)]
pub struct ManualTicker {
    period_ms: Option<u64>,
    pub starts: usize,
    pub cancels: usize,
    /// Starts issued while a trigger was already active.
    pub overlapping_starts: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period_ms(&self) -> Option<u64> {
        self.period_ms
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, period_ms: u64) {
        if self.period_ms.is_some() {
            self.overlapping_starts += 1;
        }
        self.period_ms = Some(period_ms);
        self.starts += 1;
    }

    fn cancel(&mut self) {
        if self.period_ms.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.period_ms.is_some()
    }
}

/// Decides which clock readings get published.
///
/// The trigger fires every `period_ms` but a reading is only published once
/// it has moved at least `quantum_ms` away from the last published value.
pub struct Sampler<T: Ticker> {
    ticker: T,
    period_ms: u64,
    quantum_ms: u64,
    last_published_ms: u64,
}

impl<T: Ticker> Sampler<T> {
    pub fn new(ticker: T, period_ms: u64, quantum_ms: u64) -> Self {
        Self {
            ticker,
            period_ms,
            quantum_ms,
            last_published_ms: 0,
        }
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn is_active(&self) -> bool {
        self.ticker.is_active()
    }

    /// Starts the trigger, cancelling any one already running first.
    pub fn start(&mut self) {
        self.ticker.cancel();
        self.ticker.start(self.period_ms);
        log::trace!("sampler started, period {}ms", self.period_ms);
    }

    pub fn stop(&mut self) {
        self.ticker.cancel();
        log::trace!("sampler stopped");
    }

    /// Handles one tick given the current clock reading.
    pub fn sample(&mut self, visible: bool, elapsed_ms: u64) -> Option<u64> {
        if !visible {
            return None;
        }
        if elapsed_ms.abs_diff(self.last_published_ms) < self.quantum_ms {
            return None;
        }
        self.last_published_ms = elapsed_ms;
        Some(elapsed_ms)
    }

    /// Records a value published outside of a tick (pause, reset).
    pub fn set_published(&mut self, elapsed_ms: u64) {
        self.last_published_ms = elapsed_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_ticker_counts_overlapping_start() {
        let mut ticker = ManualTicker::new();
        ticker.start(10);
        ticker.start(20);
        assert_eq!(ticker.overlapping_starts, 1);
        assert_eq!(ticker.period_ms(), Some(20));
        ticker.cancel();
        ticker.cancel();
        assert_eq!(ticker.cancels, 1);
    }

    #[test]
    fn test_quantum_gates_publication() {
        let mut sampler = Sampler::new(ManualTicker::new(), 10, 50);
        assert_eq!(sampler.sample(true, 10), None);
        assert_eq!(sampler.sample(true, 49), None);
        assert_eq!(sampler.sample(true, 50), Some(50));
        assert_eq!(sampler.sample(true, 90), None);
        assert_eq!(sampler.sample(true, 100), Some(100));
    }

    #[test]
    fn test_hidden_publishes_nothing() {
        let mut sampler = Sampler::new(ManualTicker::new(), 10, 50);
        assert_eq!(sampler.sample(false, 5000), None);
        assert_eq!(sampler.sample(true, 5000), Some(5000));
    }

    #[test]
    fn test_restart_cancels_previous_trigger() {
        let mut sampler = Sampler::new(ManualTicker::new(), 10, 50);
        sampler.start();
        sampler.start();
        assert!(sampler.is_active());
        assert_eq!(sampler.ticker().starts, 2);
        assert_eq!(sampler.ticker().cancels, 1);
        assert_eq!(sampler.ticker().overlapping_starts, 0);

        sampler.stop();
        assert!(!sampler.is_active());
        assert_eq!(sampler.ticker().period_ms(), None);
    }
}
