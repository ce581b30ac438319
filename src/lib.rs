pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod trace;

pub use error::{Result, TraceError};
pub use snapshot::{
    DiskResourceStore, MemorySnapshotStorage, PersistentSnapshotStorage, ResourceStore,
    SnapshotSink,
};
pub use trace::{ContextEntry, PageEntry, TraceEvent, TraceModel};
