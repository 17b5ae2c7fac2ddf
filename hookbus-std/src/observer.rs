//! Registration notification.

use crate::hook::Hook;
use hookbus_core::{Callback, Priority};

/// Notified after a registry successfully registers a callback.
///
/// Purely informational: nothing the observer returns is consumed.
/// Closures with the matching signature implement it.
pub trait RegistrationObserver<V> {
    /// Called once per successful registration.
    fn registered(
        &self,
        hook_name: &str,
        callback: &Callback<V>,
        arity: usize,
        priority: Priority,
        hook: &Hook<V>,
    );
}

impl<V, F> RegistrationObserver<V> for F
where
    F: Fn(&str, &Callback<V>, usize, Priority, &Hook<V>),
{
    fn registered(
        &self,
        hook_name: &str,
        callback: &Callback<V>,
        arity: usize,
        priority: Priority,
        hook: &Hook<V>,
    ) {
        self(hook_name, callback, arity, priority, hook)
    }
}

/// An observer that logs every registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl<V> RegistrationObserver<V> for TracingObserver {
    fn registered(
        &self,
        hook_name: &str,
        callback: &Callback<V>,
        arity: usize,
        priority: Priority,
        hook: &Hook<V>,
    ) {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(
                hook = hook_name,
                ?callback,
                arity,
                priority,
                callbacks = hook.callback_count(),
                "callback registered"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (hook_name, callback, arity, priority, hook);
        }
    }
}
