use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::snapshot::SensorSnapshot;

/// Cache handle shared between the poll loop and the translator.
pub type SharedCache = Arc<RwLock<SensorCache>>;

/// The two most recent sensor snapshots.
///
/// `previous` always holds what `current` held right before the latest ingest.
/// Both slots are empty until the first successful poll.
#[derive(Debug, Default)]
pub struct SensorCache {
    current: Option<SensorSnapshot>,
    previous: Option<SensorSnapshot>,
    /// Sequence number of the request that produced `current`.
    current_seq: Option<u64>,
}

impl SensorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCache {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Shift `current` into `previous` and store `snapshot` as `current`.
    pub fn ingest(&mut self, snapshot: SensorSnapshot) {
        self.previous = self.current.take();
        self.current = Some(snapshot);
    }

    /// Like [`SensorCache::ingest`], but drops `snapshot` if a request issued
    /// later than `seq` has already been ingested. Returns whether it was kept.
    pub fn ingest_sequenced(&mut self, seq: u64, snapshot: SensorSnapshot) -> bool {
        if matches!(self.current_seq, Some(held) if held >= seq) {
            return false;
        }
        self.ingest(snapshot);
        self.current_seq = Some(seq);
        true
    }

    /// Forget both snapshots.
    pub fn reset(&mut self) {
        self.current = None;
        self.previous = None;
        self.current_seq = None;
    }

    pub fn current(&self) -> Option<&SensorSnapshot> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&SensorSnapshot> {
        self.previous.as_ref()
    }
}
