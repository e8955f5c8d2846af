//! Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! Enabled via the `logging` feature; not intended for production use —
//! implement a custom [`Subscribe`] for structured logging or metrics.
//!
//! ## Output format
//! ```text
//! [launch] task=slow
//! [finish] task=slow
//! [catch-exception] by=supervisor task=faulty err="invalid input: rejected"
//! [catch-exception] by=caller err="child task 'faulty' failed: ..."
//! [fallback] task=faulty err="invalid input: rejected"
//! [cancel-requested] reason="sibling failure"
//! [cancelled] task=slow
//! [tic] task=runaway
//! [runaway] task=runaway waited_ms=10000 alive=["runaway"]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::subscribe::Subscribe;

/// Simple stdout logging subscriber.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskLaunched => {
                println!("[launch] task={:?}", e.task);
            }
            EventKind::TaskFinished => {
                println!("[finish] task={:?}", e.task);
            }
            EventKind::TaskFailed => {
                println!("[failed] task={:?} err={:?}", e.task, e.reason);
            }
            EventKind::TaskCancelled => {
                println!("[cancelled] task={:?}", e.task);
            }
            EventKind::FailureSuppressed => {
                println!(
                    "[catch-exception] by=supervisor task={:?} err={:?}",
                    e.task, e.reason
                );
            }
            EventKind::FailureCaught => {
                println!("[catch-exception] by=caller err={:?}", e.reason);
            }
            EventKind::FallbackApplied => {
                println!("[fallback] task={:?} err={:?}", e.task, e.reason);
            }
            EventKind::CancelRequested => {
                println!("[cancel-requested] reason={:?}", e.reason);
            }
            EventKind::Tic => {
                println!("[tic] task={:?}", e.task);
            }
            EventKind::RunawayDetected => {
                println!(
                    "[runaway] task={:?} waited_ms={:?} alive={:?}",
                    e.task, e.waited_ms, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
