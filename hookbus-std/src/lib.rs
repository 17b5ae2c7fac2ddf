//! # hookbus-std
//!
//! The priority dispatch engine and the pieces built around it.
//!
//! This crate provides:
//! - **Engine**: [`Hook`], a re-entrant dispatcher that tolerates mutation mid-pass
//! - **Storage**: [`PriorityTable`], [`Bucket`], [`CallbackRecord`]
//! - **Traversal**: [`BucketCursor`]
//! - **Registry**: [`Hooks`] and [`HooksBuilder`] for named hooks
//! - **Observers**: [`RegistrationObserver`], [`TracingObserver`]
//! - **Snapshots**: [`build_preinitialized`]
//! - **Testing**: recording callbacks in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use hookbus_core;

// Modules
pub mod hook;
pub mod iter;
pub mod observer;
pub mod preinit;
pub mod registry;
pub mod table;
pub mod testing;

pub use hook::Hook;
pub use iter::BucketCursor;
pub use observer::{RegistrationObserver, TracingObserver};
pub use preinit::{Preinitialized, RawCallback, build_preinitialized};
pub use registry::{ALL_HOOK, Hooks, HooksBuilder};
pub use table::{Bucket, CallbackRecord, PriorityTable};
