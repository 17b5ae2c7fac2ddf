//! Bulk construction of hooks from a snapshot.
//!
//! Used to hydrate built-in hooks before normal registration traffic
//! begins. Each entry is either an already-built [`Hook`] or a raw
//! priority → callbacks listing that is replayed through [`Hook::add`].

use crate::hook::Hook;
use hookbus_core::{Callback, IdentityBuilder, Priority};
use std::collections::{BTreeMap, HashMap};

/// One callback in a raw listing.
#[derive(Debug)]
pub struct RawCallback<V> {
    /// The callable.
    pub callback: Callback<V>,
    /// Declared number of leading arguments.
    pub arity: usize,
}

impl<V> RawCallback<V> {
    /// Create a raw entry.
    pub fn new(callback: Callback<V>, arity: usize) -> Self {
        Self { callback, arity }
    }
}

/// A hook in a snapshot.
#[derive(Debug)]
pub enum Preinitialized<V> {
    /// Used as is.
    Built(Hook<V>),
    /// Replayed in priority order, then listing order.
    Raw(BTreeMap<Priority, Vec<RawCallback<V>>>),
}

/// Build one hook per name from `filters`.
pub fn build_preinitialized<V, I>(
    filters: I,
    identity: &dyn IdentityBuilder<V>,
) -> HashMap<String, Hook<V>>
where
    I: IntoIterator<Item = (String, Preinitialized<V>)>,
{
    filters
        .into_iter()
        .map(|(name, entry)| {
            let hook = match entry {
                Preinitialized::Built(hook) => hook,
                Preinitialized::Raw(groups) => {
                    let hook = Hook::new();
                    for (priority, callbacks) in groups {
                        for raw in callbacks {
                            let id = identity.build(&name, &raw.callback, priority);
                            hook.add(priority, id, raw.callback, raw.arity);
                        }
                    }
                    hook
                }
            };
            (name, hook)
        })
        .collect()
}
