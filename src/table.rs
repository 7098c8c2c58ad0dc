use std::collections::BTreeMap;

use crate::detection::Detection;
use crate::track::{Track, TrackEntity, TrackId};

/// Authoritative store of live tracks, keyed by track id. Iteration order
/// is ascending id, which keeps every per-frame pass deterministic.
///
/// Identifiers are allocated here, monotonically and never reused. The
/// allocator is owned by the table rather than being process-global, so
/// independent pipelines can run side by side.
#[derive(Debug)]
pub struct TrackTable {
    entries: BTreeMap<TrackId, TrackEntity>,
    next_id: TrackId,
}

impl TrackTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Creates a tentative track for an unmatched detection.
    pub(crate) fn spawn(&mut self, det: &Detection, frame: u64) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;

        let prev = self.entries.insert(id, TrackEntity::new(id, det, frame));
        debug_assert!(prev.is_none(), "track id {} issued twice", id);

        id
    }

    pub(crate) fn get(&self, id: TrackId) -> Option<&TrackEntity> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TrackId) -> Option<&mut TrackEntity> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TrackEntity> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackEntity> {
        self.entries.values_mut()
    }

    pub(crate) fn remove(&mut self, id: TrackId) -> Option<TrackEntity> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Per-frame snapshot of all confirmed tracks, ascending id.
    pub fn snapshot(&self) -> Vec<Track> {
        self.entries
            .values()
            .filter(|t| t.is_confirmed())
            .map(TrackEntity::snapshot)
            .collect()
    }
}
