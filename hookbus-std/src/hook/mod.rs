//! # Priority Dispatch Engine
//!
//! [`Hook`] stores callbacks in priority buckets and runs them in ascending
//! priority, registration order within a bucket.
//!
//! # Passes
//!
//! One call to [`apply_filters`](Hook::apply_filters),
//! [`do_action`](Hook::do_action) or [`do_all_hook`](Hook::do_all_hook) is a
//! *pass*. Each pass pushes its own cursor, so passes nest: a callback may
//! start another pass on the same hook, and the outer pass resumes where it
//! left off once the inner one returns.
//!
//! # Mutation During a Pass
//!
//! Callbacks may add and remove registrations on the hook that is running
//! them. Every structural change re-seats the cursors of all running passes:
//!
//! - a priority that a pass has not reached yet is visited if it is added
//!   and skipped if it is removed;
//! - a priority that a pass already finished is never visited again;
//! - emptying the bucket that is executing does not skip the next one.
//!
//! Within the bucket that is executing, removed entries stop running
//! immediately and entries added to it wait for the next pass.
//!
//! # Threading Model
//!
//! `Hook` is single-threaded (`!Sync`). State lives in a `RefCell` that is
//! never borrowed while a callback runs.

mod cursor;

use crate::{
    iter::BucketCursor,
    table::{Bucket, CallbackRecord, PriorityTable},
};
use cursor::{ActivePass, reconcile};
use hookbus_core::{BoxError, Callback, CallbackId, HookError, Priority};
use std::{cell::RefCell, fmt};

struct State<V> {
    table: PriorityTable<V>,
    passes: Vec<ActivePass>,
    doing_action: bool,
}

impl<V> State<V> {
    fn reconcile(&mut self) {
        if self.passes.is_empty() {
            return;
        }
        let fresh = self.table.priorities();
        reconcile(&mut self.passes, &fresh);
    }
}

/// Pops its pass on every exit path, including errors and panics.
struct PassGuard<'a, V> {
    state: &'a RefCell<State<V>>,
    depth: usize,
}

impl<V> Drop for PassGuard<'_, V> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.passes.truncate(self.depth);
            if state.passes.is_empty() {
                state.doing_action = false;
            }
        }
    }
}

/// The leading `arity` arguments, or all of them if fewer were supplied.
fn leading<V>(args: &[V], arity: usize) -> &[V] {
    &args[..arity.min(args.len())]
}

/// A priority-ordered, re-entrant callback dispatcher.
///
/// # Example
///
/// ```rust,ignore
/// let hook = Hook::new();
/// hook.add(10, "trim".into(), Callback::named("trim", trim), 1);
/// hook.add(20, "upper".into(), Callback::named("upper", upper), 1);
///
/// let title = hook.apply_filters("  hi ".to_string(), &[])?;
/// assert_eq!(title, "HI");
/// ```
pub struct Hook<V> {
    state: RefCell<State<V>>,
}

impl<V> Hook<V> {
    /// Create a hook with no registrations.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                table: PriorityTable::new(),
                passes: Vec::new(),
                doing_action: false,
            }),
        }
    }

    /// Register `callback` under `id` at `priority`.
    ///
    /// Re-registering an identity at the same priority replaces its callback
    /// and arity but keeps its position in the bucket. Returns `true` when
    /// `id` was not registered at `priority` before.
    pub fn add(&self, priority: Priority, id: CallbackId, callback: Callback<V>, arity: usize) -> bool {
        let mut state = self.state.borrow_mut();

        #[cfg(feature = "tracing")]
        let logged_id = id.clone();

        let added = state
            .table
            .insert(priority, id, CallbackRecord::new(callback, arity));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            priority,
            id = %logged_id,
            arity,
            replaced = !added,
            nesting = state.passes.len(),
            "callback added"
        );

        state.reconcile();
        added
    }

    /// Unregister `id` from `priority`. Returns whether it was registered.
    pub fn remove(&self, priority: Priority, id: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let existed = state.table.remove(priority, id).is_some();
        if existed {
            #[cfg(feature = "tracing")]
            tracing::debug!(priority, id, nesting = state.passes.len(), "callback removed");

            state.reconcile();
        }
        existed
    }

    /// Unregister every callback at `priority`, or every callback at all.
    pub fn remove_all(&self, priority: Option<Priority>) {
        let mut state = self.state.borrow_mut();
        match priority {
            Some(priority) => {
                state.table.remove_bucket(priority);
            }
            None => state.table.clear(),
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(?priority, nesting = state.passes.len(), "callbacks cleared");

        state.reconcile();
    }

    /// Whether any callback is registered.
    pub fn has_callbacks(&self) -> bool {
        !self.state.borrow().table.is_empty()
    }

    /// The lowest priority `id` is registered at.
    pub fn find(&self, id: &str) -> Option<Priority> {
        self.state.borrow().table.find(id)
    }

    /// Whether `id` is registered at `priority`.
    pub fn contains(&self, priority: Priority, id: &str) -> bool {
        self.state.borrow().table.get(priority, id).is_some()
    }

    /// Registered priorities, ascending.
    pub fn priorities(&self) -> Vec<Priority> {
        self.state.borrow().table.priorities()
    }

    /// Number of registered callbacks across all priorities.
    pub fn callback_count(&self) -> usize {
        self.state.borrow().table.callback_count()
    }

    /// Number of passes currently running on this hook.
    pub fn nesting_level(&self) -> usize {
        self.state.borrow().passes.len()
    }

    /// Whether an action pass is in progress.
    pub fn is_doing_action(&self) -> bool {
        self.state.borrow().doing_action
    }

    /// Priority being executed by the outermost running pass.
    pub fn current_priority(&self) -> Option<Priority> {
        self.state.borrow().passes.first().and_then(|pass| pass.current)
    }

    /// A copy of the bucket at `priority`.
    pub fn bucket(&self, priority: Priority) -> Option<Bucket<V>> {
        self.state.borrow().table.bucket(priority).cloned()
    }

    /// Whether a bucket exists at `priority`.
    pub fn has_bucket(&self, priority: Priority) -> bool {
        self.state.borrow().table.contains_bucket(priority)
    }

    /// Replace the bucket at `priority`, returning the previous one.
    ///
    /// An empty bucket removes the priority. Running passes are re-seated.
    pub fn set_bucket(&self, priority: Priority, bucket: Bucket<V>) -> Option<Bucket<V>> {
        let mut state = self.state.borrow_mut();
        let previous = state.table.set_bucket(priority, bucket);
        state.reconcile();
        previous
    }

    /// Remove the bucket at `priority`. Running passes are re-seated.
    pub fn remove_bucket(&self, priority: Priority) -> Option<Bucket<V>> {
        let mut state = self.state.borrow_mut();
        let removed = state.table.remove_bucket(priority);
        if removed.is_some() {
            state.reconcile();
        }
        removed
    }

    /// Cursor over a snapshot of the buckets, ascending.
    pub fn buckets(&self) -> BucketCursor<V> {
        BucketCursor::new(&self.state.borrow().table)
    }

    fn enter_bucket(&self, depth: usize) -> Option<(Priority, Vec<CallbackId>)> {
        let mut state = self.state.borrow_mut();
        let State { table, passes, .. } = &mut *state;
        let pass = passes.get_mut(depth)?;
        let priority = pass.cursor.current()?;
        pass.current = Some(priority);
        let ids = table.bucket(priority).map(Bucket::ids).unwrap_or_default();
        Some((priority, ids))
    }

    fn advance(&self, depth: usize) {
        if let Some(pass) = self.state.borrow_mut().passes.get_mut(depth) {
            pass.cursor.advance();
        }
    }

    /// Current record for `id`, or `None` if it was removed mid-pass.
    fn record(&self, priority: Priority, id: &str) -> Option<(CallbackRecord<V>, bool)> {
        let state = self.state.borrow();
        let record = state.table.get(priority, id)?.clone();
        Some((record, state.doing_action))
    }
}

impl<V: Clone> Hook<V> {
    /// Run every callback, threading `value` through them.
    ///
    /// Before each call the first argument is replaced by the running value,
    /// unless an action pass is in progress on this hook. Each return value
    /// becomes the new running value. With nothing registered `value` comes
    /// back untouched and no pass is started.
    pub fn apply_filters(&self, value: V, args: &[V]) -> Result<V, HookError> {
        let mut value = value;
        self.run(args, |record, args, doing_action| {
            if !doing_action {
                match args.first_mut() {
                    Some(first) => *first = value.clone(),
                    None => args.push(value.clone()),
                }
            }
            value = record.callback.invoke(leading(args, record.arity))?;
            Ok(())
        })?;
        Ok(value)
    }

    /// Run every callback for its side effects.
    ///
    /// Return values are discarded and never fed back into the arguments.
    /// The action flag stays raised until the outermost pass finishes, so a
    /// recursive `do_action` on the same hook keeps action semantics.
    pub fn do_action(&self, args: &[V]) -> Result<(), HookError> {
        self.state.borrow_mut().doing_action = true;
        let result = self.run(args, |record, args, _| {
            record.callback.invoke(leading(args, record.arity)).map(drop)
        });

        let mut state = self.state.borrow_mut();
        if state.passes.is_empty() {
            state.doing_action = false;
        }
        result
    }

    /// Run every callback with the full argument list, ignoring arity.
    pub fn do_all_hook(&self, args: &[V]) -> Result<(), HookError> {
        self.run(args, |record, args, _| record.callback.invoke(args).map(drop))
    }

    fn run<F>(&self, args: &[V], mut call: F) -> Result<(), HookError>
    where
        F: FnMut(&CallbackRecord<V>, &mut Vec<V>, bool) -> Result<(), BoxError>,
    {
        let depth = {
            let mut state = self.state.borrow_mut();
            if state.table.is_empty() {
                return Ok(());
            }
            let keys = state.table.priorities();
            state.passes.push(ActivePass::new(keys));
            state.passes.len() - 1
        };
        let _pass = PassGuard {
            state: &self.state,
            depth,
        };
        let mut args = args.to_vec();

        while let Some((priority, ids)) = self.enter_bucket(depth) {
            #[cfg(feature = "tracing")]
            tracing::trace!(priority, depth, callbacks = ids.len(), "entering bucket");

            for id in ids {
                let Some((record, doing_action)) = self.record(priority, id.as_str()) else {
                    continue;
                };
                call(&record, &mut args, doing_action).map_err(|source| {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(priority, %id, depth, error = %source, "callback failed");

                    HookError::Callback {
                        id,
                        priority,
                        source,
                    }
                })?;
            }
            self.advance(depth);
        }
        Ok(())
    }
}

impl<V> Default for Hook<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Hook<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Hook")
                .field("priorities", &state.table.priorities())
                .field("callbacks", &state.table.callback_count())
                .field("nesting_level", &state.passes.len())
                .field("doing_action", &state.doing_action)
                .finish(),
            Err(_) => f.write_str("Hook { .. }"),
        }
    }
}
