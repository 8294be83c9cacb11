use super::interval::IntervalRegistry;
use super::timeout::TimeoutQueue;
use crate::error::SchedulerError;
use crate::task::runner::{OnceCallback, RepeatCallback};
use crate::task::{IdAllocator, TaskId, TaskOutput};
use crate::time_unit::TimeUnit;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};
use tokio::time::Instant;
use tracing::{debug, info, warn};

// Deadlines past this are clamped; the timer cannot represent them anyway.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A running timeout/interval scheduler.
///
/// Every submission returns immediately with a [`TaskId`]; callbacks run later on the
/// scheduler's own worker threads. Instances are independent of each other: each owns
/// its runtime, queue and id counter.
///
/// Created through [`SchedulerBuilder`](crate::SchedulerBuilder).
pub struct Scheduler {
    runtime: Option<Runtime>,
    thread_name: String,
    ids: IdAllocator,
    timeouts: Arc<TimeoutQueue>,
    intervals: Arc<IntervalRegistry>,
    shutdown_timeout: Duration,
}

impl Scheduler {
    pub(crate) fn start(runtime: Runtime, thread_name: String, shutdown_timeout: Duration) -> Self {
        let timeouts = Arc::new(TimeoutQueue::new());
        runtime.spawn(Arc::clone(&timeouts).run());

        Self {
            runtime: Some(runtime),
            thread_name,
            ids: IdAllocator::new(),
            timeouts,
            intervals: Arc::new(IntervalRegistry::new()),
            shutdown_timeout,
        }
    }

    /// Run `task` once after `millis` milliseconds.
    ///
    /// Zero or negative delays mean "as soon as possible".
    pub fn set_timeout<F, R>(&self, task: F, millis: i64) -> TaskId
    where
        F: FnOnce() -> R + Send + 'static,
        R: TaskOutput,
    {
        let delay = u64::try_from(millis).map_or(Duration::ZERO, Duration::from_millis);
        self.set_timeout_after(task, delay)
    }

    /// Run `task` once after `duration` expressed in `unit`.
    pub fn set_timeout_with_unit<F, R>(&self, task: F, duration: u64, unit: TimeUnit) -> TaskId
    where
        F: FnOnce() -> R + Send + 'static,
        R: TaskOutput,
    {
        self.set_timeout_after(task, unit.to_duration(duration))
    }

    /// Run `task` once after `delay`.
    pub fn set_timeout_after<F, R>(&self, task: F, delay: Duration) -> TaskId
    where
        F: FnOnce() -> R + Send + 'static,
        R: TaskOutput,
    {
        let id = self.ids.next();
        let now = Instant::now();
        let execute_at = now
            .checked_add(delay.min(FAR_FUTURE))
            .unwrap_or(now);
        let callback: OnceCallback = Box::new(move || task().into_outcome());

        self.timeouts.insert(id, execute_at, callback);
        debug!(task_id = %id, ?delay, "Timeout scheduled");
        id
    }

    /// Cancel a pending timeout. Unknown, fired or already cleared ids are ignored.
    pub fn clear_timeout(&self, id: TaskId) {
        if self.timeouts.remove(id) {
            debug!(task_id = %id, "Timeout cleared");
        }
    }

    /// Run `task` every `millis` milliseconds until cleared or until it fails.
    ///
    /// The period is measured from the end of one run to the start of the next. Each
    /// interval runs on its own thread, so a slow callback only delays its own ticks.
    pub fn set_interval<F, R>(&self, task: F, millis: u64) -> Result<TaskId, SchedulerError>
    where
        F: Fn() -> R + Send + 'static,
        R: TaskOutput,
    {
        self.set_interval_every(task, Duration::from_millis(millis))
    }

    /// Run `task` every `duration` expressed in `unit`.
    pub fn set_interval_with_unit<F, R>(
        &self,
        task: F,
        duration: u64,
        unit: TimeUnit,
    ) -> Result<TaskId, SchedulerError>
    where
        F: Fn() -> R + Send + 'static,
        R: TaskOutput,
    {
        self.set_interval_every(task, unit.to_duration(duration))
    }

    /// Run `task` every `period`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidPeriod`] for a zero period, or
    /// [`SchedulerError::Runtime`] if the interval's thread cannot be spawned.
    pub fn set_interval_every<F, R>(&self, task: F, period: Duration) -> Result<TaskId, SchedulerError>
    where
        F: Fn() -> R + Send + 'static,
        R: TaskOutput,
    {
        if period.is_zero() {
            return Err(SchedulerError::InvalidPeriod);
        }

        let id = self.ids.next();
        let callback: RepeatCallback = Box::new(move || task().into_outcome());
        self.intervals.start(&self.thread_name, id, period, callback)?;
        debug!(task_id = %id, ?period, "Interval scheduled");
        Ok(id)
    }

    /// Stop an interval. A run already in progress completes; no new run starts.
    pub fn clear_interval(&self, id: TaskId) {
        if self.intervals.cancel(id) {
            debug!(task_id = %id, "Interval cleared");
        }
    }

    /// Number of timeouts waiting for their deadline.
    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    /// Number of intervals still scheduled to fire.
    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Stop all workers, giving in-flight callbacks up to the configured grace period.
    ///
    /// Pending timeouts are discarded. Interval threads are told to stop; a run already
    /// in progress finishes on its own thread. Inside an async context the runtime is
    /// released without waiting.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };

        self.intervals.cancel_all();
        let discarded = self.timeouts.len();

        if Handle::try_current().is_ok() {
            warn!(discarded_timeouts = discarded, "Scheduler shut down from async context, not waiting for running tasks");
            runtime.shutdown_background();
        } else {
            runtime.shutdown_timeout(self.shutdown_timeout);
            info!(discarded_timeouts = discarded, "Scheduler shut down");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            self.intervals.cancel_all();
            runtime.shutdown_background();
        }
    }
}
