//! Tests for the pipeline executor
//!
//! Covers previous-result threading, declared-output overrides, the
//! pre-validation pass, and the empty-pipeline sentinel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use typewire::{
    CallState, Callable, ErrorKind, Injector, ParamSpec, Producer, ReturnValue, StateBinding,
};

#[derive(Clone, PartialEq, Debug)]
struct Label(String);

#[test]
fn test_return_value_threads_between_steps() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    let pipeline = [
        Callable::new("produce", || 40i64),
        Callable::new("add_two", |ret: ReturnValue| {
            ret.get::<i64>().copied().unwrap_or_default() + 2
        }),
    ];
    let out = injector.run(&pipeline, &CallState::new()).expect("run");
    assert_eq!(out.downcast_ref::<i64>(), Some(&42));
}

#[test]
fn test_return_value_starts_as_sentinel() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    let pipeline = [Callable::new("inspect", |ret: ReturnValue| {
        ret.is_sentinel()
    })];
    let out = injector.run(&pipeline, &CallState::new()).expect("run");
    assert_eq!(out.downcast_ref::<bool>(), Some(&true));
}

#[test]
fn test_return_value_tracks_even_unbound_outputs() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    // Neither step binds an output; the marker still follows step results.
    let pipeline = [
        Callable::new("first", || Label("first".into())),
        Callable::new("second", |ret: ReturnValue| {
            ret.get::<Label>().cloned().expect("label")
        }),
    ];
    let out = injector.run(&pipeline, &CallState::new()).expect("run");
    assert_eq!(out.downcast_ref::<Label>(), Some(&Label("first".into())));
}

#[test]
fn test_declared_output_overrides_state_value() {
    let bindings = vec![StateBinding::new::<Label>("label")];
    let injector = Injector::new(vec![], bindings, vec![]).expect("injector");

    let mut state = CallState::new();
    state.insert("label", Label("from state".into()));

    let pipeline = [
        Callable::new("replace_label", || Label("overridden".into())).bind_output(),
        Callable::new("read_label", |label: Arc<Label>| (*label).clone()),
    ];
    let out = injector.run(&pipeline, &state).expect("run");
    assert_eq!(out.downcast_ref::<Label>(), Some(&Label("overridden".into())));

    // The override is call-scoped: the next run reads the state entry again.
    let pipeline = [Callable::new("read_label", |label: Arc<Label>| {
        (*label).clone()
    })];
    let out = injector.run(&pipeline, &state).expect("run");
    assert_eq!(out.downcast_ref::<Label>(), Some(&Label("from state".into())));
}

#[test]
fn test_output_satisfies_later_step_without_state() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    // No state, no producer: the first step's declared output is the only
    // source for Label, and that is enough.
    let pipeline = [
        Callable::new("produce_label", || Label("built".into())).bind_output(),
        Callable::new("use_label", |label: Arc<Label>| label.0.clone()),
    ];
    let out = injector.run(&pipeline, &CallState::new()).expect("run");
    assert_eq!(out.downcast_ref::<String>().map(String::as_str), Some("built"));
}

#[test]
fn test_missing_annotation_fails_before_any_step_runs() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    let executed = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&executed);
    let pipeline = [
        Callable::new("count", move || {
            probe.fetch_add(1, Ordering::SeqCst);
        }),
        Callable::from_parts(
            "untyped",
            vec![ParamSpec::unannotated("x")],
            None,
            Box::new(|_| Ok(Arc::new(()))),
        ),
    ];

    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingAnnotation);
    assert_eq!(executed.load(Ordering::SeqCst), 0, "no step may execute");
}

#[test]
fn test_asynchronous_callable_rejected_before_any_step_runs() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    let executed = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&executed);
    let pipeline = [
        Callable::new("count", move || {
            probe.fetch_add(1, Ordering::SeqCst);
        }),
        Callable::new("suspends", || ()).asynchronous(),
    ];

    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedCallable);
    assert_eq!(executed.load(Ordering::SeqCst), 0, "no step may execute");
}

#[test]
fn test_empty_pipeline_returns_sentinel() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    let out = injector.run(&[], &CallState::new()).expect("run");
    assert!(out.is::<()>());
}

#[test]
fn test_failure_aborts_without_partial_result() {
    struct Missing;

    let produced = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&produced);
    let producers = vec![Producer::new("label", move || {
        probe.fetch_add(1, Ordering::SeqCst);
        Label("built".into())
    })];
    let injector = Injector::new(producers, vec![], vec![]).expect("injector");

    let pipeline = [
        Callable::new("ok_step", |_: Arc<Label>| ()),
        Callable::new("failing_step", |_: Arc<Missing>| ()),
    ];
    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unresolvable);
    // The first step ran, but the run as a whole surfaces only the error.
    assert_eq!(produced.load(Ordering::SeqCst), 1);
}
