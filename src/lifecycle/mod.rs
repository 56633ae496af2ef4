//! Lifecycle-synchronization hook mechanism
//!
//! Binds index synchronization to a domain model's mutation lifecycle:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Host mutation path                  │
//! │        save / delete on the primary store        │
//! └─────────────────────────────────────────────────┘
//!                       │ post-save / pre-destroy / post-destroy
//!                       ▼
//! ┌─────────────────────────────────────────────────┐
//! │      LifecycleObserver / ModelBinding            │
//! ├─────────────────────────────────────────────────┤
//! │  - before_sync extensions (in order)             │
//! │  - classify: deleted? → remove : upsert          │
//! │  - after_sync extensions (with outcome)          │
//! └─────────────────────────────────────────────────┘
//!                       │ exactly one call, no retry
//!                       ▼
//! ┌─────────────────────────────────────────────────┐
//! │           IndexClient collaborator               │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Model types opt in through [`LifecycleObserver::attach`] with a static
//! capability record; types without post-save/post-destroy support are simply
//! left unmanaged. Types that cannot natively answer "was this instance
//! destroyed" get a fallback: a one-way deletion flag carried by the
//! [`Tracked`] adapter, set by the pre-destroy hook so the post-destroy sync
//! can still classify correctly after the record is gone.

mod capabilities;
mod observer;
mod tracker;

pub use capabilities::{DeletionDetection, HookSupport, ModelDescriptor};
pub use observer::{AfterSyncFn, BeforeSyncFn, LifecycleObserver, ModelBinding};
pub use tracker::{DeletionStateTracker, Tracked};
