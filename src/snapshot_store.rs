// Most recent snapshot per container: the baseline deltas are computed against

use std::collections::HashMap;

use crate::models::ContainerSnapshot;

/// In-memory baseline store. Owned by the collector; one writer per cycle.
/// Entries of containers that went away are kept.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: HashMap<String, ContainerSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline for `id`; `None` means no deltas can be computed yet.
    pub fn get(&self, id: &str) -> Option<&ContainerSnapshot> {
        self.entries.get(id)
    }

    pub fn put(&mut self, id: String, snapshot: ContainerSnapshot) {
        self.entries.insert(id, snapshot);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
