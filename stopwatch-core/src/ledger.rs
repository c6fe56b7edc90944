use std::fmt;

/// Longest note a lap may carry, in characters.
pub const NOTE_MAX_CHARS: usize = 15;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LapId(String);

impl LapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces statistically unique ids for lap records.
pub trait IdSource {
    fn next_id(&mut self) -> LapId;
}

/// Deterministic ids: "lap-1", "lap-2", ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> LapId {
        self.next += 1;
        LapId(format!("lap-{}", self.next))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LapRecord {
    id: LapId,
    time_ms: u64,
    pub note: String,
}

impl LapRecord {
    pub fn id(&self) -> &LapId {
        &self.id
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }
}

pub fn truncate_note(text: &str) -> String {
    text.chars().take(NOTE_MAX_CHARS).collect()
}

/// Laps, newest first.
#[derive(Debug, Default)]
pub struct LapLedger {
    laps: Vec<LapRecord>,
}

impl LapLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    pub fn contains(&self, id: &LapId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &LapId) -> Option<&LapRecord> {
        self.laps.iter().find(|lap| &lap.id == id)
    }

    /// Prepends a lap with a fresh id and returns that id.
    pub fn record(&mut self, time_ms: u64, ids: &mut dyn IdSource) -> LapId {
        let mut id = ids.next_id();
        while self.contains(&id) {
            log::warn!("lap id {} already taken, drawing another", id);
            id = ids.next_id();
        }
        self.laps.insert(
            0,
            LapRecord {
                id: id.clone(),
                time_ms,
                note: String::new(),
            },
        );
        id
    }

    pub fn edit_note(&mut self, id: &LapId, text: &str) -> bool {
        match self.laps.iter_mut().find(|lap| &lap.id == id) {
            Some(lap) => {
                lap.note = truncate_note(text);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &LapId) -> bool {
        let before = self.laps.len();
        self.laps.retain(|lap| &lap.id != id);
        self.laps.len() != before
    }

    pub fn clear(&mut self) {
        self.laps.clear();
    }

    /// Display number of the row at `index` (newest row has the highest number).
    pub fn number_at(&self, index: usize) -> usize {
        self.laps.len().saturating_sub(index)
    }
}
