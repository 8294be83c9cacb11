use crate::error::SchedulerError;
use crate::task::runner::{self, RepeatCallback};
use crate::task::{TaskId, TaskKind};
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Stop signal shared between the registry and one interval worker.
struct StopSignal {
    running: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            running: Mutex::new(true),
            wake: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn stop(&self) {
        *self.lock() = false;
        self.wake.notify_all();
    }

    fn is_running(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `period` unless stopped first. Returns whether the interval is still running.
    fn sleep(&self, period: Duration) -> bool {
        let (running, _) = self
            .wake
            .wait_timeout_while(self.lock(), period, |running| *running)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *running
    }
}

/// Active intervals by id. The registry only holds stop signals; each worker thread
/// owns its callback.
pub(crate) struct IntervalRegistry {
    active: Mutex<HashMap<TaskId, Arc<StopSignal>>>,
}

impl IntervalRegistry {
    pub(crate) fn new() -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
        }
    }

    // No callback ever runs under this lock, so a poisoned map is still sound.
    fn lock(&self) -> MutexGuard<'_, HashMap<TaskId, Arc<StopSignal>>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `id` and start its dedicated worker thread.
    ///
    /// Each interval gets its own thread so a blocked callback cannot hold up any
    /// other interval or the timeout pool.
    pub(crate) fn start(
        self: &Arc<Self>,
        thread_name: &str,
        id: TaskId,
        period: Duration,
        callback: RepeatCallback,
    ) -> Result<(), SchedulerError> {
        let signal = Arc::new(StopSignal::new());
        // Registered before spawning so a failing first run always finds its entry.
        self.lock().insert(id, signal.clone());

        let registry = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("{}-interval-{}", thread_name, id.get()))
            .spawn(move || registry.run_worker(id, period, callback, signal));

        if let Err(e) = spawned {
            self.lock().remove(&id);
            return Err(e.into());
        }
        Ok(())
    }

    /// Stop an interval. Returns `false` if it was not active.
    pub(crate) fn cancel(&self, id: TaskId) -> bool {
        let removed = self.lock().remove(&id);
        match removed {
            Some(signal) => {
                signal.stop();
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Stop every interval, e.g. on scheduler shutdown.
    pub(crate) fn cancel_all(&self) {
        let drained: Vec<_> = self.lock().drain().collect();
        for (_, signal) in drained {
            signal.stop();
        }
    }

    fn run_worker(&self, id: TaskId, period: Duration, callback: RepeatCallback, signal: Arc<StopSignal>) {
        loop {
            if !signal.sleep(period) {
                return;
            }

            debug!(task_id = %id, "Firing interval");
            if !runner::execute(id, TaskKind::Interval, || callback()) {
                // A failing callback stops its own interval.
                self.lock().remove(&id);
                debug!(task_id = %id, "Interval stopped after task failure");
                return;
            }
        }
    }
}
