use std::collections::VecDeque;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
    Centis,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Hours, Field::Minutes, Field::Seconds, Field::Centis];

    fn index(self) -> usize {
        self as usize
    }
}

/// Zero-padded readout fields derived from an elapsed time.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DisplayParts {
    pub h: String,
    pub m: String,
    pub s: String,
    pub cs: String,
}

impl DisplayParts {
    pub fn from_ms(ms: u64) -> Self {
        let h = ms / MS_PER_HOUR;
        let m = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
        let s = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
        let cs = (ms % MS_PER_SECOND) / 10;
        Self {
            h: format!("{:02}", h),
            m: format!("{:02}", m),
            s: format!("{:02}", s),
            cs: format!("{:02}", cs),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Hours => &self.h,
            Field::Minutes => &self.m,
            Field::Seconds => &self.s,
            Field::Centis => &self.cs,
        }
    }

    /// Fields whose text differs from `prev`.
    pub fn changed_since(&self, prev: &DisplayParts) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&f| self.get(f) != prev.get(f))
            .collect()
    }
}

impl Default for DisplayParts {
    fn default() -> Self {
        Self::from_ms(0)
    }
}

impl std::fmt::Display for DisplayParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}.{}", self.h, self.m, self.s, self.cs)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GlowFlags {
    pub h: bool,
    pub m: bool,
    pub s: bool,
    pub cs: bool,
}

impl GlowFlags {
    pub fn get(&self, field: Field) -> bool {
        match field {
            Field::Hours => self.h,
            Field::Minutes => self.m,
            Field::Seconds => self.s,
            Field::Centis => self.cs,
        }
    }

    pub fn any(&self) -> bool {
        self.h || self.m || self.s || self.cs
    }
}

#[derive(Debug, Default)]
struct GlowSlot {
    lit: bool,
    // One-shot clears, oldest first. Never cancelled.
    clears: VecDeque<u64>,
}

/// Per-field glow with delayed one-shot clears.
#[derive(Debug)]
pub struct Glow {
    duration_ms: u64,
    slots: [GlowSlot; 4],
}

impl Glow {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            slots: Default::default(),
        }
    }

    pub fn light(&mut self, field: Field, now_ms: u64) {
        let slot = &mut self.slots[field.index()];
        slot.lit = true;
        slot.clears.push_back(now_ms + self.duration_ms);
    }

    /// Runs every clear due at or before `now_ms`. Returns true if any flag went dark.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        let mut dimmed = false;
        for slot in self.slots.iter_mut() {
            while slot.clears.front().is_some_and(|&at| at <= now_ms) {
                slot.clears.pop_front();
                dimmed |= slot.lit;
                slot.lit = false;
            }
        }
        dimmed
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.slots
            .iter()
            .filter_map(|slot| slot.clears.front().copied())
            .min()
    }

    pub fn flags(&self) -> GlowFlags {
        GlowFlags {
            h: self.slots[Field::Hours.index()].lit,
            m: self.slots[Field::Minutes.index()].lit,
            s: self.slots[Field::Seconds.index()].lit,
            cs: self.slots[Field::Centis.index()].lit,
        }
    }
}

/// Format milliseconds as "MM:SS.cs" with unwrapped minutes, used for laps.
pub fn format_lap_time(ms: u64) -> String {
    let m = ms / MS_PER_MINUTE;
    let s = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let cs = (ms % MS_PER_SECOND) / 10;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}
