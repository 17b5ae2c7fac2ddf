//! Error types for hookbus.
//!
//! - [`BoxError`] - What a callback returns when it fails
//! - [`HookError`] - What a dispatch pass returns when a callback fails

use crate::{identity::CallbackId, priority::Priority};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a dispatch pass.
///
/// The engine never recovers from a failing callback. The error aborts the
/// pass that invoked the callback and every pass enclosing it.
#[derive(Error, Debug)]
pub enum HookError {
    /// A callback returned an error.
    #[error("callback `{id}` at priority {priority} failed")]
    Callback {
        /// Identity of the failing callback.
        id: CallbackId,
        /// Priority bucket the callback was registered under.
        priority: Priority,
        /// The error the callback returned.
        #[source]
        source: BoxError,
    },
}

impl HookError {
    /// Identity of the callback that failed.
    pub fn callback_id(&self) -> &CallbackId {
        match self {
            HookError::Callback { id, .. } => id,
        }
    }

    /// Priority bucket of the callback that failed.
    pub fn priority(&self) -> Priority {
        match self {
            HookError::Callback { priority, .. } => *priority,
        }
    }
}
