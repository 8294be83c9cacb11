use super::scheduler::Scheduler;
use crate::config::{load_toml_config, load_yaml_config, SchedulerConfig};
use crate::error::SchedulerError;
use std::path::Path;
use tracing::info;

/// Builder for the scheduler
#[derive(Debug, Clone, Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
}

impl SchedulerBuilder {
    /// Create a new scheduler builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from the `[scheduler]` table of a TOML config file
    pub fn with_toml<P: AsRef<Path>>(path: P) -> Result<Self, SchedulerError> {
        let config = load_toml_config(path)?;
        Ok(Self::with_config(SchedulerConfig::from_config(&config)?))
    }

    /// Create from the `scheduler` table of a YAML config file
    pub fn with_yaml<P: AsRef<Path>>(path: P) -> Result<Self, SchedulerError> {
        let config = load_yaml_config(path)?;
        Ok(Self::with_config(SchedulerConfig::from_config(&config)?))
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn worker_threads(mut self, worker_threads: usize) -> Self {
        self.config.worker_threads = worker_threads;
        self
    }

    pub fn max_blocking_threads(mut self, max_blocking_threads: usize) -> Self {
        self.config.max_blocking_threads = max_blocking_threads;
        self
    }

    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.config.thread_name = thread_name.into();
        self
    }

    /// Grace period for running callbacks on shutdown, e.g. "500ms" or "2s"
    pub fn shutdown_timeout(mut self, shutdown_timeout: impl Into<String>) -> Self {
        self.config.shutdown_timeout = shutdown_timeout.into();
        self
    }

    /// Build and start the scheduler
    ///
    /// This will:
    /// - Validate the configuration
    /// - Start the scheduler's private runtime
    /// - Spawn the timer loop that fires timeouts
    ///
    /// # Example
    ///
    /// ```rust
    /// use deferred_runtime::SchedulerBuilder;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let scheduler = SchedulerBuilder::new()
    ///     .worker_threads(1)
    ///     .thread_name("docs-timers")
    ///     .build()?;
    ///
    /// let id = scheduler.set_timeout(|| println!("never printed"), 60_000);
    /// scheduler.clear_timeout(id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        self.config.validate()?;
        let shutdown_timeout = self.config.shutdown_timeout()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .max_blocking_threads(self.config.max_blocking_threads)
            .thread_name(self.config.thread_name.clone())
            .enable_time()
            .build()?;

        info!(
            worker_threads = self.config.worker_threads,
            max_blocking_threads = self.config.max_blocking_threads,
            thread_name = %self.config.thread_name,
            "Building scheduler"
        );

        Ok(Scheduler::start(runtime, self.config.thread_name, shutdown_timeout))
    }
}
