//! Host-side capabilities handed to the stopwatch core: monotonic time,
//! the pump thread that acts as the periodic trigger, and UUID lap ids.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use stopwatch_core::{IdSource, LapId, Ticker, TimeSource};
use uuid::Uuid;

use crate::AppOp;

pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicTime {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> LapId {
        LapId::new(Uuid::new_v4().to_string())
    }
}

#[derive(Debug)]
enum PumpCtl {
    Start { interval_ms: u64, generation: u64 },
    Stop,
    Quit,
}

/// Periodic trigger backed by a helper thread that posts `AppOp::Pump`
/// to the main loop.
///
/// Every start gets a new generation number; pumps already queued from an
/// older generation are recognised with [`PumpTicker::is_current`] and dropped.
pub struct PumpTicker {
    ctl: Sender<PumpCtl>,
    generation: u64,
    active: bool,
}

impl PumpTicker {
    pub fn spawn(main: Sender<AppOp>) -> io::Result<(Self, JoinHandle<()>)> {
        let (ctl, ctl_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("pump".into())
            .spawn(move || pump_thread(ctl_rx, main))?;
        Ok((
            Self {
                ctl,
                generation: 0,
                active: false,
            },
            handle,
        ))
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.active && generation == self.generation
    }

    pub fn shutdown(&self) {
        self.ctl.send(PumpCtl::Quit).ok();
    }

    fn send(&self, msg: PumpCtl) {
        if let Err(e) = self.ctl.send(msg) {
            log::error!("pump thread is gone: {:?}", e.0);
        }
    }
}

impl Ticker for PumpTicker {
    fn start(&mut self, period_ms: u64) {
        self.generation += 1;
        self.active = true;
        self.send(PumpCtl::Start {
            interval_ms: period_ms,
            generation: self.generation,
        });
    }

    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.send(PumpCtl::Stop);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn pump_thread(ctl: Receiver<PumpCtl>, main: Sender<AppOp>) {
    let mut running: Option<(Duration, u64)> = None;

    loop {
        // Wait out one interval while running, block for a command while stopped
        let msg = match running {
            Some((interval, generation)) => match ctl.recv_timeout(interval) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => {
                    if main.send(AppOp::Pump(generation)).is_err() {
                        break;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match ctl.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            },
        };

        match msg {
            PumpCtl::Start {
                interval_ms,
                generation,
            } => {
                let interval_ms = if interval_ms == 0 { 10 } else { interval_ms };
                running = Some((Duration::from_millis(interval_ms), generation));
            }
            PumpCtl::Stop => running = None,
            PumpCtl::Quit => break,
        }
    }
    log::debug!("pump thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_fires_with_generation() {
        let (tx, rx) = mpsc::channel();
        let (mut ticker, handle) = PumpTicker::spawn(tx).unwrap();
        ticker.start(1);
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(first, AppOp::Pump(1)));
        assert!(ticker.is_current(1));

        ticker.cancel();
        ticker.start(1);
        assert!(!ticker.is_current(1));
        assert!(ticker.is_current(2));

        ticker.cancel();
        assert!(!ticker.is_active());
        assert!(!ticker.is_current(2));

        ticker.shutdown();
        handle.join().unwrap();
    }

    #[test]
    fn test_uuid_ids_differ() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_monotonic_time_starts_near_zero() {
        let time = MonotonicTime::new();
        assert!(time.now_ms() < 1000);
    }
}
