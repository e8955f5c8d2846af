//! Scenario runner: builds each pattern, runs it, and reports the outcome.
//!
//! The runner owns the session-wide pieces — configuration, event bus,
//! clock, subscriber fan-out, the alive tracker, and the root cancellation
//! token. Every launch in every scenario derives its token from the root,
//! so [`ScenarioRunner::cancel_all`] (the teardown boundary an external
//! caller drives, analogous to navigating away) reaches the whole tree.
//!
//! ## Wiring
//! ```text
//! ScenarioRunner::new(cfg, subscribers)
//!   ├─► Bus::new(cfg.bus_capacity)
//!   ├─► AliveTracker (always registered)
//!   └─► listener: Bus.subscribe() ──► SubscriberSet::emit(&Event)
//!
//! run(scenario)
//!   ├─► build the pattern's units
//!   ├─► launch (detached or inside a Scope)
//!   └─► classify the observable outcome
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::clock::{ClockRef, TokioClock};
use crate::config::Config;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::scenarios::outcome::{CaughtBy, ScenarioOutcome};
use crate::scenarios::units::{CancelBehavior, Fallback, FaultyUnit, Redirect, RunawayUnit, SlowUnit};
use crate::scenarios::{Scenario, UnknownScenario};
use crate::scope::{with_scope, FailureLog, Scope, SupervisorRef};
use crate::subscribers::{AliveTracker, Subscribe, SubscriberSet};
use crate::tasks::launch::spawn_detached;
use crate::tasks::{TaskHandle, TaskState, WorkRef};

/// Runs the canonical supervision patterns and reports their outcomes.
pub struct ScenarioRunner {
    cfg: Config,
    bus: Bus,
    clock: ClockRef,
    alive: Arc<AliveTracker>,
    root: CancellationToken,
}

impl ScenarioRunner {
    /// Creates a runner with the given config and subscribers.
    ///
    /// An [`AliveTracker`] is always registered alongside the provided
    /// subscribers; it backs the runaway snapshot and [`ScenarioRunner::alive`].
    pub fn new(cfg: Config, mut subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let alive = Arc::new(AliveTracker::new());
        subscribers.push(alive.clone());

        let set = Arc::new(SubscriberSet::new(subscribers));
        Self::subscriber_listener(&bus, set);

        Self {
            cfg,
            bus,
            clock: Arc::new(TokioClock),
            alive,
            root: CancellationToken::new(),
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    fn subscriber_listener(bus: &Bus, set: Arc<SubscriberSet>) {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev).await;
            }
        });
    }

    /// The shared event bus; subscribe before [`ScenarioRunner::run`] to
    /// observe the full sequenced stream of a scenario.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Liveness view over everything launched through this runner.
    pub fn alive(&self) -> Arc<AliveTracker> {
        self.alive.clone()
    }

    /// The runner's configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Cancels the root scope and everything derived from it. Idempotent:
    /// repeated calls publish nothing and change nothing.
    ///
    /// Tasks that never reach a suspension point (the runaway pattern)
    /// accept this signal but never observe it.
    pub fn cancel_all(&self) {
        if !self.root.is_cancelled() {
            self.bus
                .publish(Event::new(EventKind::CancelRequested).with_reason("cancel_all"));
            self.root.cancel();
        }
    }

    /// Runs one scenario to its observable outcome.
    pub async fn run(&self, scenario: Scenario) -> ScenarioOutcome {
        match scenario {
            Scenario::DetachedSiblings => self.detached_siblings(false).await,
            Scenario::RedirectedSiblings => self.detached_siblings(true).await,
            Scenario::SupervisedLaunch => self.supervised_launch().await,
            Scenario::FailFastScope => self.fail_fast_scope().await,
            Scenario::LocalFallback => self.local_fallback().await,
            Scenario::RunawayLoop => self.runaway_loop().await,
        }
    }

    /// Resolves `name` (number or kebab name) and runs that scenario.
    pub async fn run_named(&self, name: &str) -> Result<ScenarioOutcome, UnknownScenario> {
        Ok(self.run(name.parse()?).await)
    }

    /// Patterns 1 and 2: two independently rooted siblings, optionally each
    /// hopping through a nested dispatch.
    ///
    /// There is no join boundary: the faulty sibling's failure escapes on
    /// its own lane, so a catch wrapped around these launches would have
    /// nothing to observe — the runner only *watches* the terminal state.
    /// The slow sibling is still mid-wait when the outcome settles.
    async fn detached_siblings(&self, redirected: bool) -> ScenarioOutcome {
        let slow = self.slow_unit(CancelBehavior::Substitute);
        let faulty = self.faulty_unit();
        let (slow, faulty): (WorkRef<i64>, WorkRef<i64>) = if redirected {
            (Redirect::arc(slow), Redirect::arc(faulty))
        } else {
            (slow, faulty)
        };

        let slow = self.spawn(slow);
        let mut faulty = self.spawn(faulty);

        if faulty.wait_terminal().await == TaskState::Failed {
            return ScenarioOutcome::UnhandledError;
        }
        // Nothing escaped; settle both branches and sum them.
        self.sum_of(vec![slow.join().await, faulty.join().await])
    }

    /// Pattern 3: flat launches with a handler attached to the faulty
    /// launch context. The failure is delivered to the handler exactly once
    /// and the caller-side catch never fires; the slow sibling is
    /// uninterrupted.
    async fn supervised_launch(&self) -> ScenarioOutcome {
        let sup = Arc::new(FailureLog::new());
        let slow = self.spawn(self.slow_unit(CancelBehavior::Substitute));
        let mut faulty = self.spawn_supervised(self.faulty_unit(), sup.clone());

        let state = faulty.wait_terminal().await;
        if sup.count().await > 0 {
            return ScenarioOutcome::CaughtError(CaughtBy::Supervisor);
        }
        if state == TaskState::Failed {
            return ScenarioOutcome::UnhandledError;
        }
        self.sum_of(vec![slow.join().await, faulty.join().await])
    }

    /// Pattern 4: both siblings inside a fail-fast scope. The scope
    /// converts the faulty sibling's failure into an error at the join
    /// boundary — here the caller's catch genuinely fires — after actively
    /// cancelling the slow sibling.
    async fn fail_fast_scope(&self) -> ScenarioOutcome {
        let scope: Scope<i64> = Scope::new(&self.root, self.clock.clone(), self.bus.clone());
        let slow = self.slow_unit(CancelBehavior::Propagate);
        let faulty = self.faulty_unit();

        let joined = with_scope(scope, |s| {
            s.launch(slow);
            s.launch(faulty);
        })
        .await;

        match joined {
            Ok(values) => ScenarioOutcome::Sum(values.iter().sum()),
            Err(err) => {
                self.bus
                    .publish(Event::new(EventKind::FailureCaught).with_reason(err.to_string()));
                ScenarioOutcome::CaughtError(CaughtBy::Caller)
            }
        }
    }

    /// Pattern 5: flat launches where each sibling catches its own failure
    /// and substitutes a value. No failure can escape, so the catch arm
    /// below is dead by construction; the slow sibling runs its full wait.
    async fn local_fallback(&self) -> ScenarioOutcome {
        let slow = self.spawn(self.slow_unit(CancelBehavior::Substitute));
        let faulty = self.spawn(Fallback::arc(self.faulty_unit(), 0));

        match (slow.join().await, faulty.join().await) {
            (Ok(a), Ok(b)) => ScenarioOutcome::Sum(a + b),
            (a, b) => {
                let err = [a.err(), b.err()].into_iter().flatten().next();
                self.bus.publish(
                    Event::new(EventKind::FailureCaught)
                        .with_reason(err.map_or_else(String::new, |e| e.to_string())),
                );
                ScenarioOutcome::CaughtError(CaughtBy::Caller)
            }
        }
    }

    /// Pattern 6: a loop with no suspension point. The runner bounds its
    /// own wait, reports the task as never completing, and leaves it
    /// running — teardown cannot reach it.
    async fn runaway_loop(&self) -> ScenarioOutcome {
        let unit: WorkRef<i64> = Arc::new(RunawayUnit::new("runaway", self.cfg.tic_interval));
        let mut handle = self.spawn(unit);

        let waited = self.cfg.runaway_grace;
        match tokio::time::timeout(waited, handle.wait_terminal()).await {
            Ok(TaskState::Failed) => ScenarioOutcome::UnhandledError,
            Ok(_) => ScenarioOutcome::Sum(0),
            Err(_elapsed) => {
                let alive = self.alive.snapshot();
                self.bus.publish(
                    Event::new(EventKind::RunawayDetected)
                        .with_task(handle.name().to_string())
                        .with_waited(waited)
                        .with_reason(format!("still alive: {alive:?}")),
                );
                ScenarioOutcome::NeverCompletes { waited }
            }
        }
    }

    fn spawn(&self, work: WorkRef<i64>) -> TaskHandle<i64> {
        spawn_detached(&self.bus, &self.clock, &self.root, None, work)
    }

    fn spawn_supervised(&self, work: WorkRef<i64>, sup: SupervisorRef) -> TaskHandle<i64> {
        spawn_detached(&self.bus, &self.clock, &self.root, Some(sup), work)
    }

    fn slow_unit(&self, on_cancel: CancelBehavior) -> WorkRef<i64> {
        Arc::new(SlowUnit::new("slow", self.cfg.slow_delay, 1, on_cancel))
    }

    fn faulty_unit(&self) -> WorkRef<i64> {
        Arc::new(FaultyUnit::new(
            "faulty",
            self.cfg.fast_delay,
            "simulated rejection",
        ))
    }

    fn sum_of(&self, results: Vec<Result<i64, TaskError>>) -> ScenarioOutcome {
        ScenarioOutcome::Sum(results.into_iter().flatten().sum())
    }
}
