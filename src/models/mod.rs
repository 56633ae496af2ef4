//! Core data types shared across the crate

mod entity;
mod event;

pub use entity::{Document, ManagedEntity};
pub use event::{IndexOp, LifecycleEvent, SyncEvent, SyncOutcome};
