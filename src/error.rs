//! Error types used by tasks and scopes.
//!
//! This module defines two main error enums:
//!
//! - [`TaskError`] — errors raised by an individual task execution.
//! - [`ScopeError`] — errors raised by a fail-fast scope join.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. Cancellation is modelled as an error variant rather than
//! a separate channel: a task whose wait is aborted returns
//! [`TaskError::Cancelled`], and a scope torn down from outside returns
//! [`ScopeError::Cancelled`] from its join.

use thiserror::Error;

/// # Errors produced by task execution.
///
/// These represent failures of individual units of work. A work function may
/// legitimately catch [`TaskError::Cancelled`] mid-wait and substitute a
/// fallback value; the other variants are genuine failures.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The work rejected its input (the fixed failure condition used by the
    /// simulated units).
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Human-readable rejection detail.
        message: String,
    },

    /// Task execution failed for any other reason (including a contained
    /// panic surfaced through the join layer).
    #[error("execution failed: {message}")]
    Fail {
        /// The underlying error message.
        message: String,
    },

    /// A suspended wait was aborted by the shared cancellation signal.
    #[error("wait aborted by cancellation")]
    Cancelled,
}

impl TaskError {
    /// Creates a [`TaskError::InvalidInput`] from any message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TaskError::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a [`TaskError::Fail`] from any message.
    pub fn fail(message: impl Into<String>) -> Self {
        TaskError::Fail {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use scopevisor::TaskError;
    ///
    /// assert_eq!(TaskError::Cancelled.as_label(), "task_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::InvalidInput { .. } => "task_invalid_input",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Cancelled => "task_cancelled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::InvalidInput { message } => format!("invalid input: {message}"),
            TaskError::Fail { message } => format!("error: {message}"),
            TaskError::Cancelled => "wait aborted by cancellation".to_string(),
        }
    }

    /// Indicates whether this error is the cancellation signal rather than a
    /// genuine work failure.
    ///
    /// # Example
    /// ```
    /// use scopevisor::TaskError;
    ///
    /// assert!(TaskError::Cancelled.is_cancellation());
    /// assert!(!TaskError::fail("boom").is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }
}

/// # Errors escaping a fail-fast scope.
///
/// A scope converts the first unhandled child failure into
/// [`ScopeError::ChildFailed`] and delivers it synchronously from
/// [`Scope::join_all`](crate::Scope::join_all) — this is the only way a child
/// failure reaches the scope's caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// A child failed and no supervisor intercepted it; all siblings were
    /// cancelled before this error was returned.
    #[error("child task '{task}' failed: {source}")]
    ChildFailed {
        /// Name of the first child observed failing.
        task: String,
        /// The child's own error.
        #[source]
        source: TaskError,
    },

    /// The scope was cancelled from outside before every child completed.
    #[error("scope cancelled before all children completed")]
    Cancelled,
}

impl ScopeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use scopevisor::ScopeError;
    ///
    /// assert_eq!(ScopeError::Cancelled.as_label(), "scope_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ScopeError::ChildFailed { .. } => "scope_child_failed",
            ScopeError::Cancelled => "scope_cancelled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ScopeError::ChildFailed { task, source } => {
                format!("child '{task}' failed: {}", source.as_message())
            }
            ScopeError::Cancelled => "scope cancelled".to_string(),
        }
    }
}
