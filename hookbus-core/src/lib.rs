//! # hookbus-core
//!
//! Core types for the hookbus priority dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that only needs to *describe* callbacks, without pulling in the
//! engine from `hookbus-std`.
//!
//! # Building Blocks
//!
//! ## Callables ([`Invocable`], [`Callback`])
//!
//! Anything that can be invoked with up to N positional arguments and
//! produce a value. [`Callback`] is the cheap, clonable handle the engine
//! stores; it wraps closures, named functions, receiver/method pairs, or a
//! user type implementing [`Invocable`].
//!
//! ## Identity ([`CallbackId`], [`IdentityBuilder`])
//!
//! The engine deduplicates registrations by an opaque key. Building that key
//! is the job of an [`IdentityBuilder`]; [`DefaultIdentity`] covers the
//! common cases.
//!
//! ## Ordering ([`Priority`])
//!
//! Plain integers. Lower values run earlier, [`DEFAULT_PRIORITY`] is 10.
//!
//! # Error Types
//!
//! - [`BoxError`] - Errors raised by callbacks
//! - [`HookError`] - Errors surfaced by a dispatch pass

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod error;
mod identity;
mod priority;

// Re-exports
pub use callback::{Callback, Invocable};
pub use error::{BoxError, HookError};
pub use identity::{CallbackId, DefaultIdentity, IdentityBuilder};
pub use priority::{DEFAULT_ARITY, DEFAULT_PRIORITY, Priority};
