//! Tests for the resolution algorithm
//!
//! Exercises the lookup order (cache, resolved values, state bindings,
//! producers), per-call memoization, lazy state extraction, ParamInfo
//! introspection, and every resolution-time failure mode.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use typewire::{
    CallState, Callable, ErrorKind, Injector, ParamInfo, ParamSpec, Producer, ResolvedValue,
    StateBinding, TypeKey,
};

struct Config {
    limit: u32,
}

struct Widget {
    limit: u32,
}

#[derive(Clone)]
struct Session {
    values: std::collections::HashMap<String, String>,
}

struct SessionValue(String);

fn session_with(entries: &[(&str, &str)]) -> Session {
    Session {
        values: entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

#[test]
fn test_resolved_value_passthrough() {
    let injector = Injector::new(vec![], vec![], vec![ResolvedValue::new(Config { limit: 9 })])
        .expect("injector");

    let pipeline = [Callable::new("read_limit", |config: Arc<Config>| {
        config.limit
    })];
    let out = injector.run(&pipeline, &CallState::new()).expect("run");
    assert_eq!(out.downcast_ref::<u32>(), Some(&9));
}

#[test]
fn test_producer_chain_resolution() {
    let producers = vec![Producer::new("widget", |config: Arc<Config>| Widget {
        limit: config.limit,
    })];
    let resolved = vec![ResolvedValue::new(Config { limit: 4 })];
    let injector = Injector::new(producers, vec![], resolved).expect("injector");

    let pipeline = [Callable::new("use_widget", |widget: Arc<Widget>| {
        widget.limit * 2
    })];
    let out = injector.run(&pipeline, &CallState::new()).expect("run");
    assert_eq!(out.downcast_ref::<u32>(), Some(&8));
}

#[test]
fn test_non_singleton_memoized_within_one_run_only() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);
    let producers = vec![Producer::new("widget", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Widget { limit: 0 }
    })];
    let injector = Injector::new(producers, vec![], vec![]).expect("injector");

    // Two steps demand the same type; the producer runs once per run.
    let pipeline = [
        Callable::new("first", |_: Arc<Widget>| ()),
        Callable::new("second", |_: Arc<Widget>| ()),
    ];
    injector.run(&pipeline, &CallState::new()).expect("run 1");
    assert_eq!(invocations.load(Ordering::SeqCst), 1);

    injector.run(&pipeline, &CallState::new()).expect("run 2");
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unresolvable_type_fails() {
    let injector = Injector::new(vec![], vec![], vec![]).expect("injector");

    let pipeline = [Callable::new("wants_widget", |_: Arc<Widget>| ())];
    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unresolvable);
    assert!(err.to_string().contains("wants_widget"));
}

#[test]
fn test_state_binding_extracts_lazily() {
    let bindings = vec![
        StateBinding::new::<Session>("session"),
        StateBinding::new::<Config>("config"),
    ];
    let injector = Injector::new(vec![], bindings, vec![]).expect("injector");

    // Only "session" is demanded; "config" may be absent from the state.
    let mut state = CallState::new();
    state.insert("session", session_with(&[("token", "abc")]));

    let pipeline = [Callable::new("read_session", |session: Arc<Session>| {
        session.values.len()
    })];
    let out = injector.run(&pipeline, &state).expect("run");
    assert_eq!(out.downcast_ref::<usize>(), Some(&1));
}

#[test]
fn test_state_entry_missing_fails() {
    let bindings = vec![StateBinding::new::<Session>("session")];
    let injector = Injector::new(vec![], bindings, vec![]).expect("injector");

    let pipeline = [Callable::new("read_session", |_: Arc<Session>| ())];
    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unresolvable);
}

#[test]
fn test_state_entry_with_wrong_type_fails() {
    let bindings = vec![StateBinding::new::<Session>("session")];
    let injector = Injector::new(vec![], bindings, vec![]).expect("injector");

    let mut state = CallState::new();
    state.insert("session", "not a session");

    let pipeline = [Callable::new("read_session", |_: Arc<Session>| ())];
    let err = injector.run(&pipeline, &state).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unresolvable);
}

#[test]
fn test_param_info_names_the_consumer_parameter() {
    let producers = vec![Producer::new(
        "session_value",
        |session: Arc<Session>, info: ParamInfo| {
            SessionValue(session.values[info.name()].clone())
        },
    )];
    let bindings = vec![StateBinding::new::<Session>("session")];
    let injector = Injector::new(producers, bindings, vec![]).expect("injector");

    let mut state = CallState::new();
    state.insert("session", session_with(&[("token", "abc")]));

    let pipeline = [
        Callable::new("read_token", |value: Arc<SessionValue>| value.0.clone())
            .param_names(["token"]),
    ];
    let out = injector.run(&pipeline, &state).expect("run");
    assert_eq!(out.downcast_ref::<String>().map(String::as_str), Some("abc"));
}

#[test]
fn test_producer_missing_annotation_is_deferred() {
    let producers = vec![Producer::from_parts(
        "mystery",
        TypeKey::of::<Widget>(),
        vec![ParamSpec::unannotated("input")],
        Box::new(|_| Ok(Arc::new(Widget { limit: 0 }))),
    )];
    // Construction succeeds; the error surfaces when the producer is demanded.
    let injector = Injector::new(producers, vec![], vec![]).expect("injector");

    let pipeline = [Callable::new("wants_widget", |_: Arc<Widget>| ())];
    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingAnnotation);
    assert!(err.to_string().contains("mystery"));
    assert!(err.to_string().contains("input"));
}

#[test]
fn test_asynchronous_producer_rejected() {
    let producers =
        vec![Producer::new("widget", || Widget { limit: 0 }).asynchronous()];
    let injector = Injector::new(producers, vec![], vec![]).expect("injector");

    let pipeline = [Callable::new("wants_widget", |_: Arc<Widget>| ())];
    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedCallable);
}

#[test]
fn test_cyclic_registration_detected_at_resolution() {
    struct Ping;
    struct Pong;

    let producers = vec![
        Producer::new("ping", |_: Arc<Pong>| Ping),
        Producer::new("pong", |_: Arc<Ping>| Pong),
    ];
    let injector = Injector::new(producers, vec![], vec![]).expect("injector");

    let pipeline = [Callable::new("wants_ping", |_: Arc<Ping>| ())];
    let err = injector.run(&pipeline, &CallState::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CyclicDependency);
    assert!(err.to_string().contains("Ping"));
}

#[test]
fn test_conflicting_registration_fails_construction() {
    let producers = vec![Producer::new("widget", || Widget { limit: 1 })];
    let resolved = vec![ResolvedValue::new(Widget { limit: 2 })];

    let err = Injector::new(producers, vec![], resolved).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConflictingBinding);
}
