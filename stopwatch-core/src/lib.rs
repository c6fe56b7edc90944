//! Pure stopwatch logic with no platform dependencies.
//! Testable on host; time, the periodic trigger and lap ids are injected.

pub mod clock;
pub mod display;
pub mod gesture;
pub mod input;
pub mod ledger;
pub mod sampler;
pub mod stopwatch;

pub use clock::{Clock, ManualTime, RunState, TimeSource};
pub use display::{format_lap_time, DisplayParts, Field, Glow, GlowFlags};
pub use gesture::{SwipeTracker, SWIPE_THRESHOLD_PX};
pub use input::{route, FocusCategory, Key, KeyAction};
pub use ledger::{truncate_note, IdSource, LapId, LapLedger, LapRecord, SequentialIds, NOTE_MAX_CHARS};
pub use sampler::{ManualTicker, Sampler, Ticker};
pub use stopwatch::{Intent, Stopwatch, Timing, View};
