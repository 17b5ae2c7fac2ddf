//! # hookbus - Re-entrant Priority Dispatch
//!
//! `hookbus` runs named extension points ("hooks"). Callbacks register under
//! an integer priority; a pass runs them in ascending priority and, within a
//! priority, in registration order.
//!
//! Two run modes share one engine:
//!
//! - **Filters** thread a value through the chain: each callback receives the
//!   running value as its first argument and returns the next one.
//! - **Actions** run callbacks for their side effects and discard returns.
//!
//! Callbacks may register, unregister, or start nested passes on the hook that
//! is running them. Running passes never skip a pending priority and never
//! revisit a finished one.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hookbus::prelude::*;
//!
//! let hooks = Hooks::new();
//! hooks.add_filter("the_title", Callback::new(|args: &[String]| Ok(args[0].trim().to_owned())), 10, 1);
//! hooks.add_filter("the_title", Callback::new(|args: &[String]| Ok(args[0].to_uppercase())), 20, 1);
//!
//! assert_eq!(hooks.apply_filters("the_title", "  hello ".into(), &[])?, "HELLO");
//! ```
//!
//! ## Features
//!
//! - `tracing`: log registrations, bucket entry and callback
//!   failures through `tracing`.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use hookbus_core::{
    // Errors
    BoxError,
    // Callables
    Callback,
    // Identity
    CallbackId,
    DEFAULT_ARITY,
    DEFAULT_PRIORITY,
    DefaultIdentity,
    HookError,
    IdentityBuilder,
    Invocable,
    // Ordering
    Priority,
};

pub use hookbus_std::{
    // Registry
    ALL_HOOK,
    // Storage
    Bucket,
    // Traversal
    BucketCursor,
    CallbackRecord,
    // Engine
    Hook,
    Hooks,
    HooksBuilder,
    // Snapshots
    Preinitialized,
    PriorityTable,
    RawCallback,
    // Observers
    RegistrationObserver,
    TracingObserver,
    build_preinitialized,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use hookbus_std::testing::*;
}

/// Prelude module - common imports for hookbus.
///
/// # Usage
///
/// ```rust,ignore
/// use hookbus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Callback, DEFAULT_ARITY, DEFAULT_PRIORITY, Hook, HookError, Hooks, Invocable,
        Priority,
    };
}
