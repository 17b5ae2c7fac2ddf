//! Per-pass traversal state.
//!
//! Every running pass owns a [`Cursor`]: the priorities it still has to
//! visit plus a position. While a pass is active its cursor always sits on
//! the priority whose bucket is executing. When the table changes under a
//! running pass, [`reconcile`] re-seats every cursor against the fresh key
//! list without re-visiting finished priorities or skipping pending ones.

use hookbus_core::Priority;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cursor {
    keys: Vec<Priority>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(keys: Vec<Priority>) -> Self {
        Self { keys, pos: 0 }
    }

    pub(crate) fn current(&self) -> Option<Priority> {
        self.keys.get(self.pos).copied()
    }

    /// Step forward. Returns `false` once the cursor runs off the end.
    pub(crate) fn advance(&mut self) -> bool {
        if self.pos < self.keys.len() {
            self.pos += 1;
        }
        self.pos < self.keys.len()
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos >= self.keys.len()
    }

    pub(crate) fn exhaust(&mut self) {
        self.keys.clear();
        self.pos = 0;
    }

    /// Swap in `fresh` (ascending, non-empty) while staying on the in-flight priority.
    ///
    /// The cursor lands on the first key not below its current one. If the
    /// current priority no longer exists it is put back at its sorted
    /// position, so the next step still lands on the first pending bucket.
    /// With `current` below every fresh key this is a plain prepend.
    pub(crate) fn reseat(&mut self, fresh: &[Priority]) {
        let Some(current) = self.current() else {
            return;
        };
        let pos = fresh.partition_point(|&priority| priority < current);
        self.keys = fresh.to_vec();
        if self.keys.get(pos) != Some(&current) {
            self.keys.insert(pos, current);
        }
        self.pos = pos;
    }
}

/// One running pass: its cursor and the priority it is executing.
#[derive(Debug)]
pub(crate) struct ActivePass {
    pub(crate) cursor: Cursor,
    pub(crate) current: Option<Priority>,
}

impl ActivePass {
    pub(crate) fn new(keys: Vec<Priority>) -> Self {
        Self {
            cursor: Cursor::new(keys),
            current: None,
        }
    }
}

/// Re-seat every active cursor, oldest pass first, after the key set changed.
pub(crate) fn reconcile(passes: &mut [ActivePass], fresh: &[Priority]) {
    if fresh.is_empty() {
        for pass in passes {
            pass.cursor.exhaust();
        }
        return;
    }

    for pass in passes {
        if pass.cursor.is_exhausted() {
            continue;
        }
        debug_assert!(
            pass.current.is_none() || pass.current == pass.cursor.current(),
            "cursor drifted off its in-flight priority"
        );
        pass.cursor.reseat(fresh);
    }
}
