//! Named-hook registry.
//!
//! [`Hooks`] owns one [`Hook`] per name, creating it on first registration
//! and dropping it once it is empty and idle. It turns callbacks into
//! identities, notifies an optional observer, runs the universal
//! [`ALL_HOOK`] ahead of every named hook, and keeps track of which hooks
//! are executing and how often they fired.
//!
//! # Example
//!
//! ```rust,ignore
//! let hooks = Hooks::builder()
//!     .observer(TracingObserver)
//!     .build();
//!
//! hooks.add_filter("the_title", Callback::named("trim", trim), DEFAULT_PRIORITY, 1);
//! let title = hooks.apply_filters("the_title", raw_title, &[])?;
//! ```

use crate::{
    hook::Hook,
    observer::RegistrationObserver,
    preinit::{Preinitialized, build_preinitialized},
};
use hookbus_core::{Callback, DefaultIdentity, HookError, IdentityBuilder, Priority};
use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

/// Name of the hook that observes every filter and action.
///
/// Its callbacks receive the full argument list of whichever hook is about
/// to run and can read that hook's name from [`Hooks::current_filter`].
pub const ALL_HOOK: &str = "all";

/// Pops the execution stack when a hook finishes, however it finishes.
struct Frame<'a> {
    stack: &'a RefCell<Vec<String>>,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        if let Ok(mut stack) = self.stack.try_borrow_mut() {
            stack.pop();
        }
    }
}

/// Builder for constructing a [`Hooks`] registry.
///
/// # Example
/// ```ignore
/// let hooks = HooksBuilder::new()
///     .identity(|hook: &str, cb: &Callback<Value>, _| CallbackId::new(format!("{hook}:{cb:?}")))
///     .preinitialized("init", Preinitialized::Raw(builtin_init()))
///     .build();
/// ```
pub struct HooksBuilder<V> {
    identity: Option<Box<dyn IdentityBuilder<V>>>,
    observer: Option<Box<dyn RegistrationObserver<V>>>,
    preinitialized: Vec<(String, Preinitialized<V>)>,
}

impl<V> HooksBuilder<V> {
    /// Create a builder with [`DefaultIdentity`] and no observer.
    pub fn new() -> Self {
        Self {
            identity: None,
            observer: None,
            preinitialized: Vec::new(),
        }
    }

    /// Use a custom identity builder.
    pub fn identity(mut self, identity: impl IdentityBuilder<V> + 'static) -> Self {
        self.identity = Some(Box::new(identity));
        self
    }

    /// Notify `observer` after every successful registration.
    pub fn observer(mut self, observer: impl RegistrationObserver<V> + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Hydrate `name` from a snapshot entry.
    pub fn preinitialized(mut self, name: impl Into<String>, hook: Preinitialized<V>) -> Self {
        self.preinitialized.push((name.into(), hook));
        self
    }

    /// Build the registry.
    pub fn build(self) -> Hooks<V> {
        let identity = self
            .identity
            .unwrap_or_else(|| Box::new(DefaultIdentity));
        let hooks = build_preinitialized(self.preinitialized, &*identity)
            .into_iter()
            .map(|(name, hook)| (name, Rc::new(hook)))
            .collect();

        Hooks {
            hooks: RefCell::new(hooks),
            identity,
            observer: self.observer,
            stack: RefCell::new(Vec::new()),
            actions: RefCell::new(HashMap::new()),
            filters: RefCell::new(HashMap::new()),
        }
    }
}

impl<V> Default for HooksBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// An owned table of named hooks.
pub struct Hooks<V> {
    hooks: RefCell<HashMap<String, Rc<Hook<V>>>>,
    identity: Box<dyn IdentityBuilder<V>>,
    observer: Option<Box<dyn RegistrationObserver<V>>>,
    stack: RefCell<Vec<String>>,
    actions: RefCell<HashMap<String, usize>>,
    filters: RefCell<HashMap<String, usize>>,
}

impl<V> Hooks<V> {
    /// Create an empty registry with default settings.
    pub fn new() -> Self {
        HooksBuilder::new().build()
    }

    /// Start configuring a registry.
    pub fn builder() -> HooksBuilder<V> {
        HooksBuilder::new()
    }

    /// Register `callback` on `name`.
    pub fn add_filter(&self, name: &str, callback: Callback<V>, priority: Priority, arity: usize) {
        let hook = Rc::clone(self.hooks.borrow_mut().entry(name.to_owned()).or_default());
        let id = self.identity.build(name, &callback, priority);
        hook.add(priority, id, callback.clone(), arity);

        if let Some(observer) = &self.observer {
            observer.registered(name, &callback, arity, priority, &hook);
        }
    }

    /// Register `callback` on `name`. Actions and filters share one table.
    pub fn add_action(&self, name: &str, callback: Callback<V>, priority: Priority, arity: usize) {
        self.add_filter(name, callback, priority, arity);
    }

    /// Unregister `callback` from `name` at `priority`.
    ///
    /// Returns whether it was registered there.
    pub fn remove_filter(&self, name: &str, callback: &Callback<V>, priority: Priority) -> bool {
        let Some(hook) = self.hook(name) else {
            return false;
        };
        let id = self.identity.build(name, callback, priority);
        let removed = hook.remove(priority, id.as_str());
        if removed {
            self.prune(name, &hook);
        }
        removed
    }

    /// Unregister `callback` from `name` at `priority`.
    pub fn remove_action(&self, name: &str, callback: &Callback<V>, priority: Priority) -> bool {
        self.remove_filter(name, callback, priority)
    }

    /// Unregister everything on `name`, or only what sits at `priority`.
    pub fn remove_all_filters(&self, name: &str, priority: Option<Priority>) {
        if let Some(hook) = self.hook(name) {
            hook.remove_all(priority);
            self.prune(name, &hook);
        }
    }

    /// Unregister everything on `name`, or only what sits at `priority`.
    pub fn remove_all_actions(&self, name: &str, priority: Option<Priority>) {
        self.remove_all_filters(name, priority);
    }

    /// Whether `name` has any callback.
    pub fn has_filter(&self, name: &str) -> bool {
        self.hook(name).is_some_and(|hook| hook.has_callbacks())
    }

    /// The lowest priority `callback` is registered at on `name`.
    pub fn has_callback(&self, name: &str, callback: &Callback<V>) -> Option<Priority> {
        let hook = self.hook(name)?;
        hook.priorities().into_iter().find(|&priority| {
            let id = self.identity.build(name, callback, priority);
            hook.contains(priority, id.as_str())
        })
    }

    /// The hook registered under `name`.
    pub fn hook(&self, name: &str) -> Option<Rc<Hook<V>>> {
        self.hooks.borrow().get(name).cloned()
    }

    /// Names of all hooks, sorted.
    pub fn hook_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.hooks.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the innermost hook being executed.
    pub fn current_filter(&self) -> Option<String> {
        self.stack.borrow().last().cloned()
    }

    /// Whether `name` is being executed, or any hook when `name` is `None`.
    pub fn doing_filter(&self, name: Option<&str>) -> bool {
        let stack = self.stack.borrow();
        match name {
            Some(name) => stack.iter().any(|running| running == name),
            None => !stack.is_empty(),
        }
    }

    /// Whether action `name` is being executed, or any hook when `name` is `None`.
    pub fn doing_action(&self, name: Option<&str>) -> bool {
        self.doing_filter(name)
    }

    /// How many times action `name` has been fired.
    pub fn did_action(&self, name: &str) -> usize {
        self.actions.borrow().get(name).copied().unwrap_or(0)
    }

    /// How many times filter `name` has been applied.
    pub fn did_filter(&self, name: &str) -> usize {
        self.filters.borrow().get(name).copied().unwrap_or(0)
    }

    fn prune(&self, name: &str, hook: &Hook<V>) {
        if hook.has_callbacks() || hook.nesting_level() > 0 {
            return;
        }
        let mut hooks = self.hooks.borrow_mut();
        if hooks
            .get(name)
            .is_some_and(|stored| std::ptr::eq(Rc::as_ptr(stored), hook))
        {
            hooks.remove(name);

            #[cfg(feature = "tracing")]
            tracing::debug!(hook = name, "hook dropped");
        }
    }

    fn bump(counter: &RefCell<HashMap<String, usize>>, name: &str) {
        *counter.borrow_mut().entry(name.to_owned()).or_default() += 1;
    }
}

impl<V: Clone> Hooks<V> {
    /// Thread `value` through the callbacks on `name`.
    ///
    /// Callbacks see `[value, extra...]` as their arguments. Returns `value`
    /// unchanged if nothing is registered on `name`.
    pub fn apply_filters(&self, name: &str, value: V, extra: &[V]) -> Result<V, HookError> {
        Self::bump(&self.filters, name);

        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(value.clone());
        args.extend_from_slice(extra);

        let _frame = self.enter(name, &args)?;
        match self.hook(name) {
            Some(hook) => {
                let result = hook.apply_filters(value, &args);
                self.prune(name, &hook);
                result
            }
            None => Ok(value),
        }
    }

    /// Run the callbacks on `name` for their side effects.
    pub fn do_action(&self, name: &str, args: &[V]) -> Result<(), HookError> {
        Self::bump(&self.actions, name);

        let _frame = self.enter(name, args)?;
        match self.hook(name) {
            Some(hook) => {
                let result = hook.do_action(args);
                self.prune(name, &hook);
                result
            }
            None => Ok(()),
        }
    }

    /// Push `name` on the execution stack and give [`ALL_HOOK`] a look.
    fn enter(&self, name: &str, args: &[V]) -> Result<Frame<'_>, HookError> {
        self.stack.borrow_mut().push(name.to_owned());
        let frame = Frame { stack: &self.stack };

        if let Some(all) = self.hook(ALL_HOOK) {
            all.do_all_hook(args)?;
        }
        Ok(frame)
    }
}

impl<V> Default for Hooks<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Hooks<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("hooks", &self.hook_names())
            .field("running", &*self.stack.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{preinit::RawCallback, testing::CallLog};
    use hookbus_core::{BoxError, CallbackId, DEFAULT_PRIORITY};
    use std::collections::BTreeMap;

    fn plus_one(args: &[i64]) -> Result<i64, BoxError> {
        Ok(args[0] + 1)
    }

    #[test]
    fn test_lazy_creation_and_pruning() {
        let hooks = Hooks::new();
        assert!(hooks.hook("count").is_none());

        let cb = Callback::named("plus_one", plus_one);
        hooks.add_filter("count", cb.clone(), DEFAULT_PRIORITY, 1);
        assert!(hooks.has_filter("count"));
        assert_eq!(hooks.hook_names(), vec!["count".to_owned()]);

        assert!(!hooks.remove_filter("count", &cb, 99));
        assert!(hooks.remove_filter("count", &cb, DEFAULT_PRIORITY));
        assert!(hooks.hook("count").is_none());
        assert!(!hooks.remove_filter("count", &cb, DEFAULT_PRIORITY));
    }

    #[test]
    fn test_apply_filters_prepends_value() {
        let hooks = Hooks::new();
        hooks.add_filter(
            "sum",
            Callback::new(|args: &[i64]| Ok(args.iter().sum())),
            DEFAULT_PRIORITY,
            3,
        );
        assert_eq!(hooks.apply_filters("sum", 1, &[10, 100]).unwrap(), 111);
        assert_eq!(hooks.apply_filters("missing", 5, &[]).unwrap(), 5);
        assert_eq!(hooks.did_filter("sum"), 1);
        assert_eq!(hooks.did_filter("missing"), 1);
    }

    #[test]
    fn test_has_callback_reports_priority() {
        let hooks = Hooks::new();
        let cb = Callback::named("plus_one", plus_one);
        hooks.add_filter("count", cb.clone(), 30, 1);
        hooks.add_filter("count", cb.clone(), 7, 1);
        assert_eq!(hooks.has_callback("count", &cb), Some(7));
        assert_eq!(hooks.has_callback("other", &cb), None);
    }

    #[test]
    fn test_remove_all_filters() {
        let hooks = Hooks::new();
        hooks.add_filter("count", Callback::named("plus_one", plus_one), 1, 1);
        hooks.add_filter("count", Callback::named("plus_one", plus_one), 2, 1);
        hooks.remove_all_filters("count", Some(1));
        assert_eq!(hooks.hook("count").unwrap().priorities(), vec![2]);
        hooks.remove_all_filters("count", None);
        assert!(!hooks.has_filter("count"));
        assert!(hooks.hook("count").is_none());
    }

    #[test]
    fn test_all_hook_sees_every_hook_first() {
        let log = CallLog::new();
        let hooks = Rc::new(Hooks::<i64>::new());

        let (weak, seen) = (Rc::downgrade(&hooks), log.clone());
        hooks.add_action(
            ALL_HOOK,
            Callback::action(move |args: &[i64]| {
                let hooks = weak.upgrade().ok_or("registry dropped")?;
                let name = hooks.current_filter().unwrap_or_default();
                seen.push(format!("all:{name}:{}", args.len()));
                Ok(())
            }),
            DEFAULT_PRIORITY,
            0,
        );
        let seen = log.clone();
        hooks.add_action(
            "save",
            Callback::action(move |_: &[i64]| {
                seen.push("save");
                Ok(())
            }),
            DEFAULT_PRIORITY,
            1,
        );

        hooks.do_action("save", &[1, 2]).unwrap();
        hooks.apply_filters("unhooked", 0, &[]).unwrap();

        assert_eq!(log.entries(), vec!["all:save:2", "save", "all:unhooked:1"]);
        assert_eq!(hooks.current_filter(), None);
        assert_eq!(hooks.did_action("save"), 1);
    }

    #[test]
    fn test_doing_filter_tracks_stack() {
        let hooks = Rc::new(Hooks::<i64>::new());
        let log = CallLog::new();

        let (weak, seen) = (Rc::downgrade(&hooks), log.clone());
        hooks.add_filter(
            "outer",
            Callback::new(move |args: &[i64]| {
                let hooks = weak.upgrade().ok_or("registry dropped")?;
                let value = hooks.apply_filters("inner", args[0], &[])?;
                seen.push(format!("outer sees inner: {}", hooks.doing_filter(Some("inner"))));
                Ok(value)
            }),
            DEFAULT_PRIORITY,
            1,
        );
        let (weak, seen) = (Rc::downgrade(&hooks), log.clone());
        hooks.add_filter(
            "inner",
            Callback::new(move |args: &[i64]| {
                let hooks = weak.upgrade().ok_or("registry dropped")?;
                seen.push(format!(
                    "{:?} {} {}",
                    hooks.current_filter(),
                    hooks.doing_filter(Some("outer")),
                    hooks.doing_filter(None)
                ));
                Ok(args[0] * 2)
            }),
            DEFAULT_PRIORITY,
            1,
        );

        assert_eq!(hooks.apply_filters("outer", 4, &[]).unwrap(), 8);
        assert_eq!(
            log.entries(),
            vec![
                "Some(\"inner\") true true".to_owned(),
                "outer sees inner: false".to_owned(),
            ]
        );
        assert!(!hooks.doing_filter(None));
    }

    #[test]
    fn test_error_unwinds_stack() {
        let hooks = Hooks::<i64>::new();
        hooks.add_filter("boom", Callback::new(|_| Err("boom".into())), 1, 1);
        let err = hooks.apply_filters("boom", 0, &[]).unwrap_err();
        assert_eq!(err.priority(), 1);
        assert!(!hooks.doing_filter(None));
    }

    #[test]
    fn test_observer_and_identity_configuration() {
        let log = CallLog::new();
        let seen = log.clone();
        let hooks = Hooks::builder()
            .identity(|hook: &str, _cb: &Callback<i64>, priority: Priority| {
                CallbackId::new(format!("{hook}#{priority}"))
            })
            .observer(move |name: &str, _cb: &Callback<i64>, arity: usize, priority: Priority, hook: &Hook<i64>| {
                seen.push(format!("{name}@{priority}/{arity} -> {}", hook.callback_count()));
            })
            .build();

        hooks.add_filter("a", Callback::new(|args: &[i64]| Ok(args[0])), 3, 2);
        hooks.add_filter("a", Callback::new(|args: &[i64]| Ok(args[0] + 1)), 3, 1);

        // Both callbacks map to "a#3", so the second replaces the first.
        assert_eq!(hooks.hook("a").unwrap().callback_count(), 1);
        assert!(hooks.hook("a").unwrap().contains(3, "a#3"));
        assert_eq!(hooks.apply_filters("a", 1, &[]).unwrap(), 2);
        assert_eq!(log.entries(), vec!["a@3/2 -> 1", "a@3/1 -> 1"]);
    }

    #[test]
    fn test_preinitialized_hooks() {
        let hooks = Hooks::builder()
            .preinitialized(
                "init",
                Preinitialized::Raw(BTreeMap::from([(
                    DEFAULT_PRIORITY,
                    vec![RawCallback::new(Callback::named("plus_one", plus_one), 1)],
                )])),
            )
            .build();

        assert!(hooks.has_filter("init"));
        assert_eq!(
            hooks.has_callback("init", &Callback::named("plus_one", plus_one)),
            Some(DEFAULT_PRIORITY)
        );
        assert_eq!(hooks.apply_filters("init", 1, &[]).unwrap(), 2);
    }

    #[test]
    fn test_prune_waits_for_running_pass() {
        let hooks = Rc::new(Hooks::<i64>::new());
        let cb = Callback::named("plus_one", plus_one);
        let weak = Rc::downgrade(&hooks);
        let target = cb.clone();
        hooks.add_filter(
            "self_removing",
            Callback::new(move |args: &[i64]| {
                let hooks = weak.upgrade().ok_or("registry dropped")?;
                hooks.remove_filter("self_removing", &target, 5);
                hooks.remove_all_filters("self_removing", Some(1));
                // Hook is empty but still running, so it stays registered.
                if hooks.hook("self_removing").is_none() {
                    return Err("hook dropped mid-pass".into());
                }
                Ok(args[0])
            }),
            1,
            1,
        );
        hooks.add_filter("self_removing", cb, 5, 1);

        assert_eq!(hooks.apply_filters("self_removing", 3, &[]).unwrap(), 3);
        assert!(!hooks.has_filter("self_removing"));
        assert!(hooks.hook("self_removing").is_none());
        assert!(hooks.hook_names().is_empty());
    }
}
