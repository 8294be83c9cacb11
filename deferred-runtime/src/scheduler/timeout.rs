use crate::task::runner::{self, OnceCallback};
use crate::task::TaskId;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

/// A one-shot task waiting for its deadline.
struct PendingTimeout {
    id: TaskId,
    execute_at: Instant,
    callback: OnceCallback,
}

impl PendingTimeout {
    // Equal deadlines fall back to id order, i.e. submission order.
    fn key(&self) -> (Instant, TaskId) {
        (self.execute_at, self.id)
    }
}

impl PartialEq for PendingTimeout {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PendingTimeout {}

impl PartialOrd for PendingTimeout {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingTimeout {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// What the timer loop should do after inspecting the queue head.
enum Next {
    Fire(PendingTimeout),
    SleepUntil(Instant),
    Idle,
}

/// Pending timeouts ordered by deadline, plus the wake signal for the timer loop.
pub(crate) struct TimeoutQueue {
    pending: Mutex<BinaryHeap<Reverse<PendingTimeout>>>,
    wake: Notify,
}

impl TimeoutQueue {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(BinaryHeap::new()),
            wake: Notify::new(),
        }
    }

    // A panicking callback never runs under this lock, so a poisoned heap is still sound.
    fn lock(&self) -> MutexGuard<'_, BinaryHeap<Reverse<PendingTimeout>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn insert(&self, id: TaskId, execute_at: Instant, callback: OnceCallback) {
        self.lock().push(Reverse(PendingTimeout {
            id,
            execute_at,
            callback,
        }));
        // Stores a permit if the loop is between inspecting the queue and waiting.
        self.wake.notify_one();
    }

    /// Remove a pending timeout. Returns `false` if it already fired or never existed.
    pub(crate) fn remove(&self, id: TaskId) -> bool {
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|Reverse(task)| task.id != id);
        pending.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn next(&self, now: Instant) -> Next {
        let mut pending = self.lock();
        match pending.peek().map(|Reverse(head)| head.execute_at) {
            Some(execute_at) if execute_at <= now => match pending.pop() {
                Some(Reverse(due)) => Next::Fire(due),
                None => Next::Idle,
            },
            Some(execute_at) => Next::SleepUntil(execute_at),
            None => Next::Idle,
        }
    }

    /// The timer loop: fire everything that is due, then sleep until the earliest
    /// deadline or until a submission wakes it.
    pub(crate) async fn run(self: Arc<Self>) {
        loop {
            match self.next(Instant::now()) {
                Next::Fire(task) => {
                    debug!(task_id = %task.id, "Firing timeout");
                    runner::spawn_once(task.id, task.callback);
                }
                Next::SleepUntil(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {}
                        _ = self.wake.notified() => {}
                    }
                }
                Next::Idle => self.wake.notified().await,
            }
        }
    }
}
