//! Registration storage.
//!
//! [`PriorityTable`] maps priorities to [`Bucket`]s. Priorities enumerate
//! in ascending order and a bucket keeps its callbacks in registration
//! order. Traversal lives separately in [`BucketCursor`](crate::iter::BucketCursor).

use hookbus_core::{Callback, CallbackId, Priority};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// A registered callback and the number of leading arguments it takes.
#[derive(Debug)]
pub struct CallbackRecord<V> {
    /// The callable.
    pub callback: Callback<V>,
    /// Declared number of leading arguments.
    pub arity: usize,
}

impl<V> CallbackRecord<V> {
    /// Create a record.
    pub fn new(callback: Callback<V>, arity: usize) -> Self {
        Self { callback, arity }
    }
}

impl<V> Clone for CallbackRecord<V> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            arity: self.arity,
        }
    }
}

/// The callbacks registered at one priority, in registration order.
#[derive(Debug)]
pub struct Bucket<V> {
    entries: IndexMap<CallbackId, CallbackRecord<V>>,
}

impl<V> Bucket<V> {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert or overwrite a record.
    ///
    /// Overwriting keeps the entry's original position. Returns `true` when
    /// the identity was not present before.
    pub fn insert(&mut self, id: CallbackId, record: CallbackRecord<V>) -> bool {
        self.entries.insert(id, record).is_none()
    }

    /// Remove a record, preserving the order of the others.
    pub fn remove(&mut self, id: &str) -> Option<CallbackRecord<V>> {
        self.entries.shift_remove(id)
    }

    /// Look up a record.
    pub fn get(&self, id: &str) -> Option<&CallbackRecord<V>> {
        self.entries.get(id)
    }

    /// Whether the identity is present.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Identities in execution order.
    pub fn ids(&self) -> Vec<CallbackId> {
        self.entries.keys().cloned().collect()
    }

    /// Records in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&CallbackId, &CallbackRecord<V>)> {
        self.entries.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bucket holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Bucket<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V> FromIterator<(CallbackId, CallbackRecord<V>)> for Bucket<V> {
    fn from_iter<I: IntoIterator<Item = (CallbackId, CallbackRecord<V>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Priority → bucket storage. Never holds an empty bucket.
#[derive(Debug)]
pub struct PriorityTable<V> {
    buckets: BTreeMap<Priority, Bucket<V>>,
}

impl<V> PriorityTable<V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Insert or overwrite `id` at `priority`.
    ///
    /// Returns `true` when `id` was not registered at `priority` before.
    pub fn insert(&mut self, priority: Priority, id: CallbackId, record: CallbackRecord<V>) -> bool {
        self.buckets.entry(priority).or_default().insert(id, record)
    }

    /// Remove `id` from `priority`, dropping the bucket if it empties.
    pub fn remove(&mut self, priority: Priority, id: &str) -> Option<CallbackRecord<V>> {
        let bucket = self.buckets.get_mut(&priority)?;
        let removed = bucket.remove(id);
        if bucket.is_empty() {
            self.buckets.remove(&priority);
        }
        removed
    }

    /// Look up one record.
    pub fn get(&self, priority: Priority, id: &str) -> Option<&CallbackRecord<V>> {
        self.buckets.get(&priority)?.get(id)
    }

    /// The lowest priority holding `id`.
    pub fn find(&self, id: &str) -> Option<Priority> {
        self.buckets
            .iter()
            .find(|(_, bucket)| bucket.contains(id))
            .map(|(priority, _)| *priority)
    }

    /// The bucket at `priority`.
    pub fn bucket(&self, priority: Priority) -> Option<&Bucket<V>> {
        self.buckets.get(&priority)
    }

    /// Replace the bucket at `priority`, returning the previous one.
    ///
    /// Installing an empty bucket removes the priority.
    pub fn set_bucket(&mut self, priority: Priority, bucket: Bucket<V>) -> Option<Bucket<V>> {
        if bucket.is_empty() {
            self.buckets.remove(&priority)
        } else {
            self.buckets.insert(priority, bucket)
        }
    }

    /// Remove the bucket at `priority`.
    pub fn remove_bucket(&mut self, priority: Priority) -> Option<Bucket<V>> {
        self.buckets.remove(&priority)
    }

    /// Whether a bucket exists at `priority`.
    pub fn contains_bucket(&self, priority: Priority) -> bool {
        self.buckets.contains_key(&priority)
    }

    /// Drop every bucket.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// All priorities, ascending.
    pub fn priorities(&self) -> Vec<Priority> {
        self.buckets.keys().copied().collect()
    }

    /// Buckets in ascending priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Priority, &Bucket<V>)> {
        self.buckets.iter().map(|(priority, bucket)| (*priority, bucket))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of records across buckets.
    pub fn callback_count(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<V> Default for PriorityTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for PriorityTable<V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
        }
    }
}
