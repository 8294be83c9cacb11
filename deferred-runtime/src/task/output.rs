use crate::error::TaskFailure;
use std::fmt::Display;

/// Return types a scheduled callback may produce.
///
/// `()` always counts as success. `Result<(), E>` counts an `Err` as a failure; the
/// error is logged and, for intervals, stops further firings.
///
/// # Example
///
/// ```rust
/// use deferred_runtime::SchedulerBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scheduler = SchedulerBuilder::new().build()?;
///
/// scheduler.set_timeout(|| println!("plain callback"), 10);
/// scheduler.set_timeout(|| -> Result<(), String> { Err("logged, not raised".into()) }, 10);
/// # Ok(())
/// # }
/// ```
pub trait TaskOutput {
    fn into_outcome(self) -> Result<(), TaskFailure>;
}

impl TaskOutput for () {
    fn into_outcome(self) -> Result<(), TaskFailure> {
        Ok(())
    }
}

impl<E: Display> TaskOutput for Result<(), E> {
    fn into_outcome(self) -> Result<(), TaskFailure> {
        self.map_err(|e| TaskFailure::Error(e.to_string()))
    }
}
