//! Testing utilities for hookbus.
//!
//! This module provides callbacks that record what the engine does with
//! them, to make ordering, arity and mutation behaviour easy to assert.
//!
//! # Features
//!
//! - [`CallLog`]: A shared, ordered log of labels
//! - [`ArgLog`]: A shared log of the argument lists callbacks received
//! - [`recorder`]: A pass-through filter that logs its label
//! - [`adder`]: A filter that adds a constant and logs its label
//! - [`capturing`]: A pass-through filter that logs its arguments
//! - [`failing`]: A callback that always errors

use hookbus_core::{BoxError, Callback};
use std::{cell::RefCell, rc::Rc};

// ============================================================================
// Logs
// ============================================================================

/// A shared, ordered log of callback labels.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// hook.add(10, "a".into(), recorder::<i64>(&log, "a"), 1);
/// hook.apply_filters(0, &[0])?;
/// assert_eq!(log.entries(), vec!["a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// A copy of the entries so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// A shared log of argument lists.
#[derive(Debug)]
pub struct ArgLog<V> {
    calls: Rc<RefCell<Vec<Vec<V>>>>,
}

impl<V: Clone> ArgLog<V> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A copy of every recorded argument list.
    pub fn calls(&self) -> Vec<Vec<V>> {
        self.calls.borrow().clone()
    }

    /// The most recent argument list.
    pub fn last(&self) -> Option<Vec<V>> {
        self.calls.borrow().last().cloned()
    }
}

impl<V: Clone> Default for ArgLog<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ArgLog<V> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
        }
    }
}

// ============================================================================
// Callbacks
// ============================================================================

/// A filter that logs `label` and returns its first argument unchanged.
pub fn recorder<V: Clone + Default + 'static>(log: &CallLog, label: &str) -> Callback<V> {
    let (log, label) = (log.clone(), label.to_owned());
    Callback::new(move |args: &[V]| {
        log.push(label.clone());
        Ok(args.first().cloned().unwrap_or_default())
    })
}

/// A filter that logs `label` and returns its first argument plus `n`.
pub fn adder(log: &CallLog, label: &str, n: i64) -> Callback<i64> {
    let (log, label) = (log.clone(), label.to_owned());
    Callback::new(move |args: &[i64]| {
        log.push(label.clone());
        Ok(args.first().copied().unwrap_or_default() + n)
    })
}

/// A filter that records its arguments and returns the first one.
pub fn capturing<V: Clone + Default + 'static>(log: &ArgLog<V>) -> Callback<V> {
    let log = log.clone();
    Callback::new(move |args: &[V]| {
        log.calls.borrow_mut().push(args.to_vec());
        Ok(args.first().cloned().unwrap_or_default())
    })
}

/// A callback that always fails with `message`.
pub fn failing<V: 'static>(message: &str) -> Callback<V> {
    let message = message.to_owned();
    Callback::new(move |_: &[V]| Err(BoxError::from(message.clone())))
}
