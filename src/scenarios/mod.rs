//! The six canonical supervision patterns.
//!
//! Each scenario launches two simulated work units — a slow one (completes
//! with `1` after its wait; may catch a cancellation mid-wait and substitute
//! that value) and a faulty one (fails with a fixed invalid-input error
//! after a shorter wait) — composed differently each time:
//!
//! | # | Scenario | Structure | Caller observes |
//! |---|----------|-----------|-----------------|
//! | 1 | [`Scenario::DetachedSiblings`] | flat launches, no join boundary | `UnhandledError`; the join-site catch never fires |
//! | 2 | [`Scenario::RedirectedSiblings`] | same, each unit hops through a nested dispatch | identical to 1 — redirection is not a join boundary |
//! | 3 | [`Scenario::SupervisedLaunch`] | flat, handler attached to the faulty launch | `CaughtError(Supervisor)`; handler fires exactly once |
//! | 4 | [`Scenario::FailFastScope`] | both inside a fail-fast scope | `CaughtError(Caller)`; the slow sibling is cancelled |
//! | 5 | [`Scenario::LocalFallback`] | flat, each unit catches its own failure | `Sum(1)`; the slow sibling runs to natural completion |
//! | 6 | [`Scenario::RunawayLoop`] | one loop with no suspension point | `NeverCompletes`; survives `cancel_all` |
//!
//! Scenario 6 is the negative-correctness case: it documents that the
//! cancellation signal is advisory, not preemptive — a loop that never
//! suspends or polls cannot be stopped, only leaked.

mod outcome;
mod runner;
mod units;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use outcome::{CaughtBy, ScenarioOutcome};
pub use runner::ScenarioRunner;
pub use units::{CancelBehavior, Fallback, FaultyUnit, Redirect, RunawayUnit, SlowUnit};

/// One of the six canonical supervision patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Two independently rooted siblings; a failure escapes asynchronously.
    DetachedSiblings,
    /// As above, with each unit's work hopping through a nested dispatch.
    RedirectedSiblings,
    /// Flat launches with a failure handler attached to the faulty launch.
    SupervisedLaunch,
    /// Both siblings inside a fail-fast scope.
    FailFastScope,
    /// Flat launches where each unit substitutes a fallback on failure.
    LocalFallback,
    /// A single loop that never reaches a suspension point.
    RunawayLoop,
}

impl Scenario {
    /// All scenarios, in canonical order.
    pub const ALL: [Scenario; 6] = [
        Scenario::DetachedSiblings,
        Scenario::RedirectedSiblings,
        Scenario::SupervisedLaunch,
        Scenario::FailFastScope,
        Scenario::LocalFallback,
        Scenario::RunawayLoop,
    ];

    /// Canonical 1-based number.
    pub fn number(&self) -> u8 {
        match self {
            Scenario::DetachedSiblings => 1,
            Scenario::RedirectedSiblings => 2,
            Scenario::SupervisedLaunch => 3,
            Scenario::FailFastScope => 4,
            Scenario::LocalFallback => 5,
            Scenario::RunawayLoop => 6,
        }
    }

    /// Stable kebab-case name.
    pub fn as_name(&self) -> &'static str {
        match self {
            Scenario::DetachedSiblings => "detached-siblings",
            Scenario::RedirectedSiblings => "redirected-siblings",
            Scenario::SupervisedLaunch => "supervised-launch",
            Scenario::FailFastScope => "fail-fast-scope",
            Scenario::LocalFallback => "local-fallback",
            Scenario::RunawayLoop => "runaway-loop",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_name())
    }
}

/// Returned when a scenario name or number cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scenario '{0}'")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    /// Accepts the canonical number (`"1"`..`"6"`) or kebab name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "detached-siblings" => Ok(Scenario::DetachedSiblings),
            "2" | "redirected-siblings" => Ok(Scenario::RedirectedSiblings),
            "3" | "supervised-launch" => Ok(Scenario::SupervisedLaunch),
            "4" | "fail-fast-scope" => Ok(Scenario::FailFastScope),
            "5" | "local-fallback" => Ok(Scenario::LocalFallback),
            "6" | "runaway-loop" => Ok(Scenario::RunawayLoop),
            other => Err(UnknownScenario(other.to_string())),
        }
    }
}
