use kswitcher_core::VirtualKey;

/// A character keystroke as it was typed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeystrokeRecord {
    pub key: VirtualKey,
    pub shift: bool,
    /// Captured for completeness. Replay reconstructs Shift only.
    pub caps_lock: bool,
}

impl KeystrokeRecord {
    pub fn is_space(&self) -> bool {
        self.key == VirtualKey::SPACE
    }
}

/// Character keystrokes typed since the last reset, in typing order.
///
/// Only character keys are ever pushed. The buffer shrinks by backspace
/// pops and full clears, nothing else.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeystrokeBuffer {
    records: Vec<KeystrokeRecord>,
}

impl KeystrokeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: KeystrokeRecord) {
        debug_assert!(record.key.is_character());
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<KeystrokeRecord> {
        self.records.pop()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Whether the last buffered keystroke is a space, i.e. the current word
    /// has been terminated.
    pub fn ends_with_space(&self) -> bool {
        self.records.last().is_some_and(KeystrokeRecord::is_space)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Empties the buffer and returns what it held.
    pub fn take(&mut self) -> Vec<KeystrokeRecord> {
        std::mem::take(&mut self.records)
    }
}

/// The keystrokes replayed by the most recent correction and how many times
/// in a row they have been corrected.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CorrectionHistory {
    records: Vec<KeystrokeRecord>,
    count: u32,
}

impl CorrectionHistory {
    pub fn store(&mut self, records: Vec<KeystrokeRecord>, count: u32) {
        self.records = records;
        self.count = count;
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.count = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[KeystrokeRecord] {
        &self.records
    }

    /// Consecutive corrections applied to these records; 0 when empty.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Empties the history and returns the records with their count.
    pub fn take(&mut self) -> (Vec<KeystrokeRecord>, u32) {
        let count = std::mem::replace(&mut self.count, 0);
        (std::mem::take(&mut self.records), count)
    }
}
