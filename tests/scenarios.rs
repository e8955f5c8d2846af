//! End-to-end coverage of the six supervision patterns.
//!
//! Scenarios 1–5 run on virtual time (`start_paused`), so the 5 s / 2 s
//! simulated waits complete instantly while elapsed-time assertions still
//! hold. The runaway scenario runs on real time with a scaled-down config,
//! because its loop lives on a plain OS thread that the tokio clock cannot
//! fast-forward.

use std::time::Duration;

use scopevisor::{
    CaughtBy, Config, Event, EventKind, Scenario, ScenarioOutcome, ScenarioRunner,
};
use tokio::sync::broadcast::Receiver;

fn runner() -> ScenarioRunner {
    ScenarioRunner::new(Config::default(), Vec::new())
}

fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

fn has_kind_for(events: &[Event], kind: EventKind, task: &str) -> bool {
    events
        .iter()
        .any(|e| e.kind == kind && e.task.as_deref() == Some(task))
}

fn terminal_for(events: &[Event], task: &str) -> bool {
    events
        .iter()
        .any(|e| e.is_terminal() && e.task.as_deref() == Some(task))
}

#[tokio::test(start_paused = true)]
async fn test_detached_siblings_failure_escapes_the_join_site() {
    let runner = runner();
    let mut rx = runner.bus().subscribe();
    let started = tokio::time::Instant::now();

    let outcome = runner.run(Scenario::DetachedSiblings).await;

    assert_eq!(outcome, ScenarioOutcome::UnhandledError);
    // Bounded by the faulty sibling, not the slow one.
    assert!(started.elapsed() < Duration::from_secs(5));

    let events = drain(&mut rx);
    assert!(has_kind_for(&events, EventKind::TaskFailed, "faulty"));
    // The caller-side catch never fires...
    assert!(!events.iter().any(|e| e.kind == EventKind::FailureCaught));
    // ...and the slow sibling is still mid-wait when the outcome settles.
    assert!(!terminal_for(&events, "slow"));
}

#[tokio::test(start_paused = true)]
async fn test_redirected_siblings_match_detached_behavior() {
    let runner = runner();
    let mut rx = runner.bus().subscribe();

    let outcome = runner.run(Scenario::RedirectedSiblings).await;

    assert_eq!(outcome, ScenarioOutcome::UnhandledError);
    let events = drain(&mut rx);
    // The nested hop relays the failure unchanged; redirection is not a
    // join boundary.
    assert!(has_kind_for(&events, EventKind::TaskFailed, "faulty-hop"));
    assert!(has_kind_for(&events, EventKind::TaskFailed, "faulty"));
    assert!(!events.iter().any(|e| e.kind == EventKind::FailureCaught));
    assert!(!terminal_for(&events, "slow"));
}

#[tokio::test(start_paused = true)]
async fn test_supervised_launch_delivers_to_handler_exactly_once() {
    let runner = runner();
    let mut rx = runner.bus().subscribe();

    let outcome = runner.run(Scenario::SupervisedLaunch).await;

    assert_eq!(outcome, ScenarioOutcome::CaughtError(CaughtBy::Supervisor));

    let events = drain(&mut rx);
    let suppressed: Vec<&Event> = events
        .iter()
        .filter(|e| e.kind == EventKind::FailureSuppressed)
        .collect();
    assert_eq!(suppressed.len(), 1);
    assert_eq!(suppressed[0].task.as_deref(), Some("faulty"));
    // Interception replaces the unhandled-failure event entirely.
    assert!(!has_kind_for(&events, EventKind::TaskFailed, "faulty"));
    assert!(!events.iter().any(|e| e.kind == EventKind::FailureCaught));
    // The slow sibling keeps running, uninterrupted.
    assert!(!terminal_for(&events, "slow"));
}

#[tokio::test(start_paused = true)]
async fn test_fail_fast_scope_cancels_sibling_then_propagates() {
    let runner = runner();
    let mut rx = runner.bus().subscribe();
    let started = tokio::time::Instant::now();

    let outcome = runner.run(Scenario::FailFastScope).await;

    assert_eq!(outcome, ScenarioOutcome::CaughtError(CaughtBy::Caller));
    // The slow sibling was cancelled well before its natural finish.
    assert!(started.elapsed() < Duration::from_secs(5));

    let events = drain(&mut rx);
    let failed = events
        .iter()
        .find(|e| e.kind == EventKind::TaskFailed && e.task.as_deref() == Some("faulty"))
        .expect("faulty failure");
    let cancelled: Vec<&Event> = events
        .iter()
        .filter(|e| e.kind == EventKind::TaskCancelled)
        .collect();
    let caught = events
        .iter()
        .find(|e| e.kind == EventKind::FailureCaught)
        .expect("caller catch");

    // Exactly children-1 siblings transitioned to Cancelled.
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].task.as_deref(), Some("slow"));
    // Failure observed first, fan-out next, caller catch last.
    assert!(failed.seq < cancelled[0].seq);
    assert!(cancelled[0].seq < caught.seq);
}

#[tokio::test(start_paused = true)]
async fn test_local_fallback_sums_substituted_branch() {
    let runner = runner();
    let mut rx = runner.bus().subscribe();
    let started = tokio::time::Instant::now();

    let outcome = runner.run(Scenario::LocalFallback).await;

    // Slow branch contributes 1, the failed branch its substituted 0.
    assert_eq!(outcome, ScenarioOutcome::Sum(1));
    // The slow sibling was not cancelled: the run lasts its full wait.
    assert!(started.elapsed() >= Duration::from_secs(5));

    let events = drain(&mut rx);
    assert!(has_kind_for(&events, EventKind::FallbackApplied, "faulty"));
    assert!(has_kind_for(&events, EventKind::TaskFinished, "slow"));
    assert!(!events.iter().any(|e| e.kind == EventKind::TaskCancelled));
    assert!(!events.iter().any(|e| e.kind == EventKind::FailureCaught));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_runaway_loop_outlives_cancellation() {
    let cfg = Config {
        tic_interval: Duration::from_millis(20),
        runaway_grace: Duration::from_millis(200),
        ..Config::default()
    };
    let runner = ScenarioRunner::new(cfg, Vec::new());
    let alive = runner.alive();
    let mut rx = runner.bus().subscribe();

    let outcome = runner.run(Scenario::RunawayLoop).await;
    assert_eq!(
        outcome,
        ScenarioOutcome::NeverCompletes {
            waited: Duration::from_millis(200)
        }
    );
    assert!(alive.is_alive("runaway"));

    // Teardown is accepted but never observed; repeating it is a no-op.
    runner.cancel_all();
    runner.cancel_all();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(alive.is_alive("runaway"));

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| e.kind == EventKind::RunawayDetected));
    let cancel_requests: Vec<&Event> = events
        .iter()
        .filter(|e| e.kind == EventKind::CancelRequested)
        .collect();
    assert_eq!(cancel_requests.len(), 1);
    // The loop keeps ticking after the cancellation request.
    let cancel_seq = cancel_requests[0].seq;
    assert!(events
        .iter()
        .any(|e| e.kind == EventKind::Tic && e.seq > cancel_seq));
}

#[tokio::test(start_paused = true)]
async fn test_run_named_resolves_numbers_and_names() {
    let runner = runner();
    assert_eq!(
        runner.run_named("5").await,
        Ok(ScenarioOutcome::Sum(1))
    );
    assert_eq!(
        runner.run_named("fail-fast-scope").await,
        Ok(ScenarioOutcome::CaughtError(CaughtBy::Caller))
    );
    assert!(runner.run_named("nope").await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_is_idempotent() {
    let runner = runner();
    let mut rx = runner.bus().subscribe();
    runner.cancel_all();
    runner.cancel_all();
    let events = drain(&mut rx);
    assert_eq!(
        events
            .iter()
            .filter(|e| e.kind == EventKind::CancelRequested)
            .count(),
        1
    );
}
