//! Snapshot indexing and content-addressed resource access.

pub mod persistent;
pub mod resources;
pub mod sink;

pub use persistent::PersistentSnapshotStorage;
pub use resources::{DiskResourceStore, ResourceStore};
pub use sink::{MemorySnapshotStorage, SnapshotSink};
