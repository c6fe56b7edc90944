use crate::clock::{Clock, RunState, TimeSource};
use crate::display::{DisplayParts, Glow, GlowFlags};
use crate::ledger::{IdSource, LapId, LapLedger, LapRecord};
use crate::sampler::{Sampler, Ticker};

/// User intents accepted by [`Stopwatch::dispatch`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Intent {
    Toggle,
    RecordLap,
    Reset,
    EditNote { id: LapId, text: String },
    DeleteLap(LapId),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Timing {
    /// Period of the sampling trigger.
    pub tick_ms: u64,
    /// Minimum change before a new elapsed value is published.
    pub display_quantum_ms: u64,
    /// How long a changed readout field glows.
    pub glow_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            display_quantum_ms: 50,
            glow_ms: 140,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct View<'a> {
    pub display: &'a DisplayParts,
    pub glow: GlowFlags,
    pub run_state: RunState,
    pub laps: &'a [LapRecord],
}

/// Stopwatch state container.
///
/// Time, the periodic trigger and lap ids all come from injected
/// capabilities, so the whole machine can be driven by hand in tests.
pub struct Stopwatch<S: TimeSource, T: Ticker, I: IdSource> {
    time: S,
    ids: I,
    clock: Clock,
    sampler: Sampler<T>,
    elapsed_ms: u64,
    display: DisplayParts,
    glow: Glow,
    laps: LapLedger,
    visible: bool,
    pending_focus: Option<LapId>,
}

impl<S: TimeSource, T: Ticker, I: IdSource> Stopwatch<S, T, I> {
    pub fn new(time: S, ticker: T, ids: I) -> Self {
        Self::with_timing(time, ticker, ids, Timing::default())
    }

    pub fn with_timing(time: S, ticker: T, ids: I, timing: Timing) -> Self {
        Self {
            time,
            ids,
            clock: Clock::new(),
            sampler: Sampler::new(ticker, timing.tick_ms, timing.display_quantum_ms),
            elapsed_ms: 0,
            display: DisplayParts::default(),
            glow: Glow::new(timing.glow_ms),
            laps: LapLedger::new(),
            visible: true,
            pending_focus: None,
        }
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Toggle => self.toggle(),
            Intent::RecordLap => self.record_lap(),
            Intent::Reset => self.reset(),
            Intent::EditNote { id, text } => {
                if !self.laps.edit_note(&id, &text) {
                    log::debug!("edit for unknown lap {}", id);
                }
            }
            Intent::DeleteLap(id) => {
                if self.laps.delete(&id) {
                    log::debug!("deleted lap {}", id);
                    if self.pending_focus.as_ref() == Some(&id) {
                        self.pending_focus = None;
                    }
                }
            }
        }
    }

    fn toggle(&mut self) {
        let now = self.time.now_ms();
        match self.clock.state() {
            RunState::Stopped => {
                self.clock.start(now);
                self.sampler.start();
                log::debug!("started at {}ms elapsed", self.elapsed_ms);
            }
            RunState::Running => {
                self.sampler.stop();
                // Freeze at the value on screen; resume continues from it.
                self.clock.freeze(self.elapsed_ms);
                log::debug!("paused at {}ms elapsed", self.elapsed_ms);
            }
        }
    }

    fn record_lap(&mut self) {
        if !self.clock.state().is_running() {
            return;
        }
        let id = self.laps.record(self.elapsed_ms, &mut self.ids);
        log::debug!("lap {} at {}ms", id, self.elapsed_ms);
        self.pending_focus = Some(id);
    }

    fn reset(&mut self) {
        let now = self.time.now_ms();
        self.sampler.stop();
        self.clock.reset();
        self.sampler.set_published(0);
        self.laps.clear();
        self.pending_focus = None;
        self.publish(0, now);
        log::debug!("reset");
    }

    /// Handles one firing of the periodic trigger. Returns true if a new
    /// elapsed value was published.
    pub fn tick(&mut self) -> bool {
        // A tick already in flight when the trigger was cancelled.
        if !self.clock.state().is_running() {
            return false;
        }
        let now = self.time.now_ms();
        let reading = self.clock.elapsed_ms(now);
        match self.sampler.sample(self.visible, reading) {
            Some(elapsed) => {
                self.publish(elapsed, now);
                true
            }
            None => false,
        }
    }

    fn publish(&mut self, elapsed_ms: u64, now_ms: u64) {
        self.elapsed_ms = elapsed_ms;
        let next = DisplayParts::from_ms(elapsed_ms);
        for field in next.changed_since(&self.display) {
            self.glow.light(field, now_ms);
        }
        self.display = next;
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            log::debug!("visibility changed: {}", visible);
        }
        self.visible = visible;
    }

    /// Runs due glow clears. Returns true if any flag changed.
    pub fn expire_glow(&mut self) -> bool {
        self.glow.expire(self.time.now_ms())
    }

    pub fn next_glow_deadline(&self) -> Option<u64> {
        self.glow.next_deadline()
    }

    pub fn take_pending_focus(&mut self) -> Option<LapId> {
        self.pending_focus.take()
    }

    pub fn pending_focus(&self) -> Option<&LapId> {
        self.pending_focus.as_ref()
    }

    pub fn view(&self) -> View<'_> {
        View {
            display: &self.display,
            glow: self.glow.flags(),
            run_state: self.clock.state(),
            laps: self.laps.laps(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn run_state(&self) -> RunState {
        self.clock.state()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn laps(&self) -> &LapLedger {
        &self.laps
    }

    pub fn ticker(&self) -> &T {
        self.sampler.ticker()
    }

    pub fn time(&self) -> &S {
        &self.time
    }
}
