//! Callback identities.
//!
//! A hook stores at most one record per identity and priority. Registering
//! the same identity twice at one priority overwrites the record in place.

use crate::{callback::Callback, priority::Priority};
use std::{borrow::Borrow, fmt};

/// Opaque key that identifies a registration within a priority bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(String);

impl CallbackId {
    /// Create an identity from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallbackId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CallbackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CallbackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CallbackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Computes the identity a callback is stored under.
///
/// The engine never calls this itself; registries do, and hand the
/// precomputed key to `Hook::add`. Closures with the matching signature
/// implement it.
pub trait IdentityBuilder<V> {
    /// Build the identity of `callback` registered on `hook_name` at `priority`.
    fn build(&self, hook_name: &str, callback: &Callback<V>, priority: Priority) -> CallbackId;
}

impl<V, F> IdentityBuilder<V> for F
where
    F: Fn(&str, &Callback<V>, Priority) -> CallbackId,
{
    fn build(&self, hook_name: &str, callback: &Callback<V>, priority: Priority) -> CallbackId {
        self(hook_name, callback, priority)
    }
}

/// Name-or-address identities.
///
/// Callables with a stable [`name`](Callback::name) are identified by it,
/// so re-registering a named function or a receiver/method pair replaces
/// the earlier entry. Anonymous closures are identified by the address of
/// their shared allocation. Hook name and priority do not participate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultIdentity;

impl<V> IdentityBuilder<V> for DefaultIdentity {
    fn build(&self, _hook_name: &str, callback: &Callback<V>, _priority: Priority) -> CallbackId {
        match callback.name() {
            Some(name) => CallbackId(name),
            None => CallbackId(format!("{:#x}", callback.address())),
        }
    }
}
