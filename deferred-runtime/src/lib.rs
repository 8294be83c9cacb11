//! Deferred Runtime - Core engine for timeout and interval scheduling
//!
//! This crate provides the scheduler behind `setTimeout` / `setInterval` style APIs:
//! a single timer loop that fires one-shot tasks in deadline order, one worker per
//! recurring task, and a task runner that contains callback failures.

mod config;
mod error;
mod scheduler;
mod task;
mod time_unit;

// Re-export public API
pub use crate::config::{load_toml_config, load_yaml_config, SchedulerConfig};
pub use crate::error::{SchedulerError, TaskFailure};
pub use crate::scheduler::{Scheduler, SchedulerBuilder};
pub use crate::task::{TaskId, TaskOutput};
pub use crate::time_unit::TimeUnit;
