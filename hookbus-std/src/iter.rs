//! Forward traversal over a table's buckets.

use crate::table::{Bucket, PriorityTable};
use hookbus_core::Priority;

/// Forward-only cursor over a snapshot of buckets in ascending priority.
///
/// The snapshot is taken at construction time, so later registrations do
/// not disturb an inspection that is already under way. Besides the
/// explicit `key`/`current`/`advance`/`rewind` operations it is also an
/// [`Iterator`] that yields from the current position onward.
#[derive(Debug)]
pub struct BucketCursor<V> {
    entries: Vec<(Priority, Bucket<V>)>,
    pos: usize,
}

impl<V> BucketCursor<V> {
    /// Snapshot `table`.
    pub fn new(table: &PriorityTable<V>) -> Self {
        Self {
            entries: table
                .iter()
                .map(|(priority, bucket)| (priority, bucket.clone()))
                .collect(),
            pos: 0,
        }
    }

    /// Priority at the cursor.
    pub fn key(&self) -> Option<Priority> {
        self.entries.get(self.pos).map(|(priority, _)| *priority)
    }

    /// Bucket at the cursor.
    pub fn current(&self) -> Option<&Bucket<V>> {
        self.entries.get(self.pos).map(|(_, bucket)| bucket)
    }

    /// Whether the cursor points at a bucket.
    pub fn has_more(&self) -> bool {
        self.pos < self.entries.len()
    }

    /// Step to the next bucket, returning its priority.
    pub fn advance(&mut self) -> Option<Priority> {
        if self.pos < self.entries.len() {
            self.pos += 1;
        }
        self.key()
    }

    /// Go back to the first bucket.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

impl<V> Iterator for BucketCursor<V> {
    type Item = (Priority, Bucket<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.entries.get(self.pos).cloned()?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}
