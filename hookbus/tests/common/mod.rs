#![allow(dead_code)]

use hookbus::{BoxError, Callback, Hook, Priority, testing::CallLog};
use std::rc::Rc;

// ============================================================================
// Hooks
// ============================================================================

pub fn shared_hook() -> Rc<Hook<i64>> {
    Rc::new(Hook::new())
}

/// A callback that can reach the hook it is registered on.
pub fn reentrant<F>(hook: &Rc<Hook<i64>>, func: F) -> Callback<i64>
where
    F: Fn(&Hook<i64>, &[i64]) -> Result<i64, BoxError> + 'static,
{
    let weak = Rc::downgrade(hook);
    Callback::new(move |args: &[i64]| {
        let hook = weak.upgrade().ok_or("hook dropped")?;
        func(&hook, args)
    })
}

/// Register a pass-through callback that logs `label`.
pub fn record_at(hook: &Hook<i64>, log: &CallLog, priority: Priority, label: &str) {
    hook.add(
        priority,
        label.into(),
        hookbus::testing::recorder(log, label),
        1,
    );
}

/// Register a `+n` filter that logs `label`.
pub fn add_at(hook: &Hook<i64>, log: &CallLog, priority: Priority, label: &str, n: i64) {
    hook.add(
        priority,
        label.into(),
        hookbus::testing::adder(log, label, n),
        1,
    );
}
