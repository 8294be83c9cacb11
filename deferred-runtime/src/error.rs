use thiserror::Error;

/// Errors raised while building a scheduler or submitting work to it.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// An interval was submitted with a zero period.
    #[error("interval period must be greater than zero")]
    InvalidPeriod,

    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load scheduler configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to start scheduler runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Why a scheduled callback did not complete successfully.
///
/// Failures are logged by the scheduler and never returned to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    #[error("task returned an error: {0}")]
    Error(String),

    #[error("task panicked: {0}")]
    Panic(String),
}
