//! Snapshot indexing: the capability the trace model forwards resource and
//! frame snapshots to.

use crate::trace::events::{FrameSnapshot, ResourceSnapshot};
use std::collections::HashMap;

/// Receives snapshot records in recording order and answers queries over
/// what it has seen so far.
pub trait SnapshotSink {
    fn add_resource(&mut self, resource: ResourceSnapshot);

    fn add_frame_snapshot(&mut self, snapshot: FrameSnapshot);

    /// All resources observed so far, in recording order.
    fn resources(&self) -> Vec<ResourceSnapshot>;
}

/// In-memory snapshot index.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStorage {
    resources: Vec<ResourceSnapshot>,
    /// frame id -> snapshots of that frame, oldest first
    frames: HashMap<String, Vec<FrameSnapshot>>,
    /// snapshot name -> (frame id, index into that frame's list)
    names: HashMap<String, (String, usize)>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots of one frame in recording order.
    pub fn frame_snapshots(&self, frame_id: &str) -> &[FrameSnapshot] {
        self.frames
            .get(frame_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up a snapshot by the name an action's metadata refers to it by.
    pub fn snapshot_by_name(&self, name: &str) -> Option<&FrameSnapshot> {
        let (frame_id, index) = self.names.get(name)?;
        self.frames.get(frame_id)?.get(*index)
    }

    /// Total number of frame snapshots across all frames.
    pub fn snapshot_count(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }
}

impl SnapshotSink for MemorySnapshotStorage {
    fn add_resource(&mut self, resource: ResourceSnapshot) {
        self.resources.push(resource);
    }

    fn add_frame_snapshot(&mut self, snapshot: FrameSnapshot) {
        let snapshots = self.frames.entry(snapshot.frame_id.clone()).or_default();
        if let Some(name) = &snapshot.snapshot_name {
            self.names
                .insert(name.clone(), (snapshot.frame_id.clone(), snapshots.len()));
        }
        snapshots.push(snapshot);
    }

    fn resources(&self) -> Vec<ResourceSnapshot> {
        self.resources.clone()
    }
}
