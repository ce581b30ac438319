//! Snapshot storage backed by a recording on disk.

use crate::config::TraceConfig;
use crate::error::Result;
use crate::snapshot::resources::{DiskResourceStore, ResourceStore};
use crate::snapshot::sink::{MemorySnapshotStorage, SnapshotSink};
use crate::trace::events::{FrameSnapshot, ResourceSnapshot};
use std::path::PathBuf;

/// Pairs a snapshot index with a resource store so a single value can both
/// ingest snapshot events and serve the bytes they reference.
#[derive(Debug, Clone)]
pub struct PersistentSnapshotStorage<S = MemorySnapshotStorage, R = DiskResourceStore> {
    index: S,
    store: R,
}

impl PersistentSnapshotStorage {
    /// In-memory index over the blobs in `resources_dir`.
    pub fn open(resources_dir: impl Into<PathBuf>) -> Self {
        let store = DiskResourceStore::new(resources_dir);
        tracing::debug!("Opened snapshot storage at {:?}", store.resources_dir());
        Self::with_parts(MemorySnapshotStorage::new(), store)
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::open(config.resources_dir())
    }
}

impl<S, R> PersistentSnapshotStorage<S, R> {
    pub fn with_parts(index: S, store: R) -> Self {
        Self { index, store }
    }

    pub fn index(&self) -> &S {
        &self.index
    }

    pub fn store(&self) -> &R {
        &self.store
    }
}

impl<S: SnapshotSink, R> SnapshotSink for PersistentSnapshotStorage<S, R> {
    fn add_resource(&mut self, resource: ResourceSnapshot) {
        self.index.add_resource(resource);
    }

    fn add_frame_snapshot(&mut self, snapshot: FrameSnapshot) {
        self.index.add_frame_snapshot(snapshot);
    }

    fn resources(&self) -> Vec<ResourceSnapshot> {
        self.index.resources()
    }
}

impl<S, R: ResourceStore> ResourceStore for PersistentSnapshotStorage<S, R> {
    fn resource_content(&self, sha1: &str) -> Result<Vec<u8>> {
        self.store.resource_content(sha1)
    }
}
