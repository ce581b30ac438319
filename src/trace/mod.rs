//! Trace events and the model built from them.

pub mod events;
pub mod model;

pub use events::TraceEvent;
pub use model::{ContextEntry, PageEntry, TraceModel};
