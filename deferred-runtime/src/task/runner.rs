use super::{TaskId, TaskKind};
use crate::error::TaskFailure;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// A one-shot callback, already adapted to report its outcome.
pub(crate) type OnceCallback = Box<dyn FnOnce() -> Result<(), TaskFailure> + Send>;

/// A repeatable callback, owned by its interval's worker thread.
pub(crate) type RepeatCallback = Box<dyn Fn() -> Result<(), TaskFailure> + Send>;

/// Invoke a callback, containing both `Err` returns and panics.
///
/// Returns `true` when the callback completed successfully. Failures are logged
/// here and never reach the caller.
pub(crate) fn execute<F>(id: TaskId, kind: TaskKind, callback: F) -> bool
where
    F: FnOnce() -> Result<(), TaskFailure>,
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(TaskFailure::Panic(panic_message(payload.as_ref()))),
    };

    match outcome {
        Ok(()) => {
            debug!(task_id = %id, kind = kind.as_str(), "Task completed");
            true
        }
        Err(failure) => {
            error!(task_id = %id, kind = kind.as_str(), error = %failure, "Scheduled task failed");
            false
        }
    }
}

/// Fire a timeout on the blocking pool without waiting for it.
pub(crate) fn spawn_once(id: TaskId, callback: OnceCallback) {
    tokio::task::spawn_blocking(move || {
        execute(id, TaskKind::Timeout, callback);
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
