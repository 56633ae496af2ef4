//! The external index collaborator boundary
//!
//! The synchronization core talks to the search backend through one narrow
//! interface, [`IndexClient`]: insert-or-replace an entity's serialized state,
//! or remove it by identity. No wire format, query DSL, or persisted state is
//! owned here.
//!
//! Two implementations ship with the crate:
//!
//! - [`InMemoryIndex`] — reference client for MVP and testing, with exact
//!   per-operation counters
//! - [`TantivyIndex`] — embedded full-text client over a minimal generic
//!   schema, for hosts that want local search without a remote backend

mod client;
mod local;
mod memory;

pub use client::{Ack, IndexClient, IndexError, IndexResult};
pub use local::{IndexStats, TantivyIndex};
pub use memory::InMemoryIndex;
