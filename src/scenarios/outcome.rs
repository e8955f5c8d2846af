//! Observable outcome of one scenario run.

use std::time::Duration;

/// Who consumed a failure before it could propagate further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaughtBy {
    /// The caller's catch at a scope join site.
    Caller,
    /// An attached failure handler.
    Supervisor,
}

impl CaughtBy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CaughtBy::Caller => "caller",
            CaughtBy::Supervisor => "supervisor",
        }
    }
}

/// Result of [`ScenarioRunner::run`](crate::ScenarioRunner::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// Every observed branch completed; the values summed.
    Sum(i64),
    /// A failure occurred and was caught — the tag says by whom.
    CaughtError(CaughtBy),
    /// A failure escaped without anything catching it.
    UnhandledError,
    /// The task never reached a terminal state within the runner's grace;
    /// it remains alive until process exit.
    NeverCompletes {
        /// How long the runner waited before giving up.
        waited: Duration,
    },
}

impl ScenarioOutcome {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScenarioOutcome::Sum(_) => "sum",
            ScenarioOutcome::CaughtError(CaughtBy::Caller) => "caught_by_caller",
            ScenarioOutcome::CaughtError(CaughtBy::Supervisor) => "caught_by_supervisor",
            ScenarioOutcome::UnhandledError => "unhandled_error",
            ScenarioOutcome::NeverCompletes { .. } => "never_completes",
        }
    }
}
