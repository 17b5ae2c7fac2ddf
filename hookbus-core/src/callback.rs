//! # Callables
//!
//! A callback is anything that can be invoked with up to N positional
//! arguments and return a value. The engine never looks inside a callback:
//! it slices the argument list down to the callback's arity and calls
//! [`Invocable::invoke`].
//!
//! # Variants
//!
//! | Constructor                  | Shape                                  | Stable name                 |
//! |------------------------------|----------------------------------------|-----------------------------|
//! | [`Callback::new`]            | closure returning a value              | none                        |
//! | [`Callback::action`]         | closure returning `()`                 | none                        |
//! | [`Callback::named`]          | free function                          | the given name              |
//! | [`Callback::method`]         | shared receiver + method               | `<receiver address>::name`  |
//! | [`Callback::from_invocable`] | user type implementing [`Invocable`]   | whatever it reports         |

use crate::error::BoxError;
use std::{fmt, rc::Rc};

/// Something the engine can call with a slice of leading arguments.
///
/// The slice holds at most as many values as the callback's declared arity.
pub trait Invocable<V> {
    /// Call with the given positional arguments.
    fn invoke(&self, args: &[V]) -> Result<V, BoxError>;

    /// A stable name, if this callable has one.
    ///
    /// Used by [`DefaultIdentity`](crate::DefaultIdentity) to recognise the
    /// same callable across separately constructed handles.
    fn name(&self) -> Option<String> {
        None
    }
}

struct Closure<F>(F);

impl<V, F> Invocable<V> for Closure<F>
where
    F: Fn(&[V]) -> Result<V, BoxError> + 'static,
{
    fn invoke(&self, args: &[V]) -> Result<V, BoxError> {
        (self.0)(args)
    }
}

struct Action<F>(F);

impl<V, F> Invocable<V> for Action<F>
where
    V: Default,
    F: Fn(&[V]) -> Result<(), BoxError> + 'static,
{
    fn invoke(&self, args: &[V]) -> Result<V, BoxError> {
        (self.0)(args)?;
        Ok(V::default())
    }
}

struct NamedFn<V> {
    name: &'static str,
    func: fn(&[V]) -> Result<V, BoxError>,
}

impl<V: 'static> Invocable<V> for NamedFn<V> {
    fn invoke(&self, args: &[V]) -> Result<V, BoxError> {
        (self.func)(args)
    }

    fn name(&self) -> Option<String> {
        Some(self.name.to_owned())
    }
}

struct Method<T, V> {
    receiver: Rc<T>,
    name: &'static str,
    func: fn(&T, &[V]) -> Result<V, BoxError>,
}

impl<T: 'static, V: 'static> Invocable<V> for Method<T, V> {
    fn invoke(&self, args: &[V]) -> Result<V, BoxError> {
        (self.func)(&self.receiver, args)
    }

    fn name(&self) -> Option<String> {
        Some(format!("{:p}::{}", Rc::as_ptr(&self.receiver), self.name))
    }
}

/// A shared handle to a registered callable.
///
/// Cloning is O(1). Two clones of the same handle have the same
/// [`address`](Callback::address), which is what identifies anonymous
/// closures.
pub struct Callback<V>(Rc<dyn Invocable<V>>);

impl<V: 'static> Callback<V> {
    /// Wrap a closure whose return value feeds the next filter.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[V]) -> Result<V, BoxError> + 'static,
    {
        Self(Rc::new(Closure(func)))
    }

    /// Wrap a closure that runs for its side effects only.
    ///
    /// The callback reports `V::default()`, which action passes discard.
    pub fn action<F>(func: F) -> Self
    where
        V: Default,
        F: Fn(&[V]) -> Result<(), BoxError> + 'static,
    {
        Self(Rc::new(Action(func)))
    }

    /// Wrap a free function under a stable name.
    pub fn named(name: &'static str, func: fn(&[V]) -> Result<V, BoxError>) -> Self {
        Self(Rc::new(NamedFn { name, func }))
    }

    /// Bind a method to a shared receiver.
    ///
    /// Handles built from the same receiver and method name share an identity.
    pub fn method<T: 'static>(
        receiver: Rc<T>,
        name: &'static str,
        func: fn(&T, &[V]) -> Result<V, BoxError>,
    ) -> Self {
        Self(Rc::new(Method {
            receiver,
            name,
            func,
        }))
    }

    /// Wrap a custom [`Invocable`].
    pub fn from_invocable<I: Invocable<V> + 'static>(invocable: I) -> Self {
        Self(Rc::new(invocable))
    }
}

impl<V> Callback<V> {
    /// Call with the given positional arguments.
    pub fn invoke(&self, args: &[V]) -> Result<V, BoxError> {
        self.0.invoke(args)
    }

    /// The stable name of the underlying callable, if any.
    pub fn name(&self) -> Option<String> {
        self.0.name()
    }

    /// Address of the shared allocation.
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl<V> Clone for Callback<V> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<V> fmt::Debug for Callback<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.debug_tuple("Callback").field(&name).finish(),
            None => write!(f, "Callback({:#x})", self.address()),
        }
    }
}
