//! # Deferred - setTimeout / setInterval for Rust
//!
//! This library provides the familiar event-loop timer primitives as a process-wide
//! facility usable from plain threads or async code alike.
//!
//! ## Features
//!
//! - **Timeouts**: run a callback once after a delay
//! - **Intervals**: run a callback repeatedly with a fixed delay between runs
//! - **Cancellation**: every submission returns a [`TaskId`] for `clear_timeout` / `clear_interval`
//! - **Failure isolation**: callbacks that panic or return `Err` are logged, never propagated;
//!   a failing interval stops itself
//! - **Config support**: tune the worker threads from TOML/YAML files or the environment
//!
//! ## Quick Start
//!
//! ```rust
//! use deferred::TimeUnit;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let id = deferred::set_timeout(|| println!("once, after 50ms"), 50);
//! deferred::clear_timeout(id);
//!
//! let ticker = deferred::set_interval_with_unit(|| println!("every second"), 1, TimeUnit::Seconds)?;
//! deferred::clear_interval(ticker);
//! # Ok(())
//! # }
//! ```
//!
//! ## Dedicated schedulers
//!
//! The free functions forward to [`global()`]. Build independent instances, e.g. for
//! tests, with [`SchedulerBuilder`]:
//!
//! ```rust
//! use deferred::SchedulerBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // or SchedulerBuilder::with_toml("config/deferred.toml")?
//! let scheduler = SchedulerBuilder::new()
//!     .thread_name("my-timers")
//!     .build()?;
//!
//! scheduler.set_timeout(|| println!("fired"), 10);
//! scheduler.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! The global scheduler reads `DEFERRED_SCHEDULER__*` environment variables:
//!
//! ```bash
//! export DEFERRED_SCHEDULER__WORKER_THREADS=4
//! export DEFERRED_SCHEDULER__THREAD_NAME=app-timers
//! ```

use std::sync::OnceLock;
use std::time::Duration;
use tracing::warn;

// Re-export core types
pub use deferred_runtime::{
    load_toml_config, load_yaml_config, Scheduler, SchedulerBuilder, SchedulerConfig,
    SchedulerError, TaskFailure, TaskId, TaskOutput, TimeUnit,
};

static GLOBAL: OnceLock<Scheduler> = OnceLock::new();

/// The process-wide default scheduler, created on first use.
///
/// It is configured from `DEFERRED_SCHEDULER__*` environment variables; invalid settings
/// are logged and replaced by the defaults. It lives until the process exits.
///
/// # Panics
///
/// Panics if the scheduler's worker threads cannot be started at all.
pub fn global() -> &'static Scheduler {
    GLOBAL.get_or_init(|| {
        let from_env = SchedulerConfig::from_env()
            .and_then(|config| SchedulerBuilder::with_config(config).build());

        match from_env {
            Ok(scheduler) => scheduler,
            Err(e) => {
                warn!(error = %e, "Invalid global scheduler configuration, using defaults");
                SchedulerBuilder::new()
                    .build()
                    .unwrap_or_else(|e| panic!("Failed to start the global scheduler: {}", e))
            }
        }
    })
}

/// Run `task` once after `millis` milliseconds on the global scheduler.
pub fn set_timeout<F, R>(task: F, millis: i64) -> TaskId
where
    F: FnOnce() -> R + Send + 'static,
    R: TaskOutput,
{
    global().set_timeout(task, millis)
}

/// Run `task` once after `duration` expressed in `unit` on the global scheduler.
pub fn set_timeout_with_unit<F, R>(task: F, duration: u64, unit: TimeUnit) -> TaskId
where
    F: FnOnce() -> R + Send + 'static,
    R: TaskOutput,
{
    global().set_timeout_with_unit(task, duration, unit)
}

/// Run `task` once after `delay` on the global scheduler.
pub fn set_timeout_after<F, R>(task: F, delay: Duration) -> TaskId
where
    F: FnOnce() -> R + Send + 'static,
    R: TaskOutput,
{
    global().set_timeout_after(task, delay)
}

/// Cancel a pending timeout on the global scheduler. Unknown ids are ignored.
pub fn clear_timeout(id: TaskId) {
    global().clear_timeout(id);
}

/// Run `task` every `millis` milliseconds on the global scheduler.
pub fn set_interval<F, R>(task: F, millis: u64) -> Result<TaskId, SchedulerError>
where
    F: Fn() -> R + Send + 'static,
    R: TaskOutput,
{
    global().set_interval(task, millis)
}

/// Run `task` every `duration` expressed in `unit` on the global scheduler.
pub fn set_interval_with_unit<F, R>(task: F, duration: u64, unit: TimeUnit) -> Result<TaskId, SchedulerError>
where
    F: Fn() -> R + Send + 'static,
    R: TaskOutput,
{
    global().set_interval_with_unit(task, duration, unit)
}

/// Run `task` every `period` on the global scheduler.
pub fn set_interval_every<F, R>(task: F, period: Duration) -> Result<TaskId, SchedulerError>
where
    F: Fn() -> R + Send + 'static,
    R: TaskOutput,
{
    global().set_interval_every(task, period)
}

/// Stop an interval on the global scheduler. Unknown ids are ignored.
pub fn clear_interval(id: TaskId) {
    global().clear_interval(id);
}
