//! Ordering, arity and value-threading tests.

use hookbus::{
    Callback, Hook,
    testing::{ArgLog, CallLog, capturing},
};

mod common;
use common::{add_at, record_at};

#[test]
fn test_priorities_run_ascending() {
    let hook = Hook::new();
    let log = CallLog::new();
    for priority in [30, -1, 10, 0, 999] {
        record_at(&hook, &log, priority, &format!("p{priority}"));
    }

    hook.apply_filters(0, &[0]).unwrap();
    assert_eq!(log.entries(), vec!["p-1", "p0", "p10", "p30", "p999"]);
}

#[test]
fn test_same_priority_keeps_registration_order() {
    let hook = Hook::new();
    let log = CallLog::new();
    for label in ["first", "second", "third"] {
        record_at(&hook, &log, 10, label);
    }

    hook.apply_filters(0, &[0]).unwrap();
    assert_eq!(log.entries(), vec!["first", "second", "third"]);
}

#[test]
fn test_reregistering_keeps_position() {
    let hook = Hook::new();
    let log = CallLog::new();
    add_at(&hook, &log, 10, "a", 1);
    add_at(&hook, &log, 10, "b", 1);
    add_at(&hook, &log, 10, "a", 100);

    assert_eq!(hook.apply_filters(0, &[0]).unwrap(), 101);
    assert_eq!(log.entries(), vec!["a", "b"]);
}

#[test]
fn test_filter_threading() {
    let hook = Hook::new();
    let log = CallLog::new();
    add_at(&hook, &log, 10, "f1", 1);
    add_at(&hook, &log, 10, "f2", 1);
    add_at(&hook, &log, 20, "f3", 1);

    assert_eq!(hook.apply_filters(0, &[0]).unwrap(), 3);
    assert_eq!(log.entries(), vec!["f1", "f2", "f3"]);
}

#[test]
fn test_arity_truncation() {
    // (arity, supplied) -> received
    let cases = [(0, 3, 0), (3, 3, 3), (5, 3, 3), (1, 3, 1), (2, 0, 0), (0, 0, 0)];

    for (arity, supplied, expected) in cases {
        let hook = Hook::new();
        let args_log = ArgLog::new();
        hook.add(10, "spy".into(), capturing(&args_log), arity);

        let args: Vec<i64> = (1..=supplied).collect();
        hook.do_action(&args).unwrap();

        let received = args_log.last().unwrap();
        assert_eq!(
            received.len(),
            expected,
            "arity {arity} with {supplied} args"
        );
        assert_eq!(received, args[..expected].to_vec());
    }
}

#[test]
fn test_filter_replaces_first_argument_only() {
    let hook = Hook::new();
    let log = CallLog::new();
    let args_log = ArgLog::new();
    add_at(&hook, &log, 10, "plus", 5);
    hook.add(20, "spy".into(), capturing(&args_log), 3);

    assert_eq!(hook.apply_filters(1, &[1, 7, 8]).unwrap(), 6);
    assert_eq!(args_log.last(), Some(vec![6, 7, 8]));
}

#[test]
fn test_empty_hook_returns_seed_without_pass() {
    let hook = Hook::<i64>::new();
    assert_eq!(hook.apply_filters(42, &[42]).unwrap(), 42);
    assert_eq!(hook.nesting_level(), 0);
    hook.do_action(&[1]).unwrap();
    assert!(!hook.is_doing_action());
}

#[test]
fn test_do_action_discards_return_values() {
    let hook = Hook::new();
    let log = CallLog::new();
    let args_log = ArgLog::new();
    add_at(&hook, &log, 10, "plus", 998);
    hook.add(20, "spy".into(), capturing(&args_log), 2);

    let args = vec![1, 2];
    hook.do_action(&args).unwrap();

    assert_eq!(args_log.last(), Some(vec![1, 2]));
    assert_eq!(args, vec![1, 2]);
    assert_eq!(log.entries(), vec!["plus"]);
}

#[test]
fn test_do_all_hook_ignores_arity() {
    let hook = Hook::new();
    let args_log = ArgLog::new();
    hook.add(10, "zero".into(), capturing(&args_log), 0);
    hook.add(20, "one".into(), capturing(&args_log), 1);

    hook.do_all_hook(&[3, 4, 5]).unwrap();
    assert_eq!(args_log.calls(), vec![vec![3, 4, 5], vec![3, 4, 5]]);
}

#[test]
fn test_error_stops_pass() {
    let hook = Hook::new();
    let log = CallLog::new();
    record_at(&hook, &log, 10, "before");
    hook.add(15, "broken".into(), hookbus::testing::failing("broken"), 1);
    record_at(&hook, &log, 20, "after");

    let err = hook.apply_filters(0, &[0]).unwrap_err();
    assert_eq!(err.callback_id().as_str(), "broken");
    assert_eq!(err.priority(), 15);
    assert_eq!(log.entries(), vec!["before"]);
    assert_eq!(hook.nesting_level(), 0);
}

#[test]
fn test_named_and_method_callbacks() {
    use std::rc::Rc;

    fn double(args: &[i64]) -> Result<i64, hookbus::BoxError> {
        Ok(args[0] * 2)
    }

    struct Offset(i64);
    impl Offset {
        fn apply(&self, args: &[i64]) -> Result<i64, hookbus::BoxError> {
            Ok(args[0] + self.0)
        }
    }

    let hook = Hook::new();
    hook.add(10, "double".into(), Callback::named("double", double), 1);
    hook.add(
        20,
        "offset".into(),
        Callback::method(Rc::new(Offset(3)), "apply", Offset::apply),
        1,
    );

    assert_eq!(hook.apply_filters(5, &[5]).unwrap(), 13);
}
