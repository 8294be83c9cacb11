use crate::error::SchedulerError;
use crate::time_unit::TimeUnit;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "DEFERRED";
const CONFIG_TABLE: &str = "scheduler";

/// Environment overrides: `DEFERRED_SCHEDULER__WORKER_THREADS=4` sets `scheduler.worker_threads`.
fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load config from a specific TOML file
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, SchedulerError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(env_source())
        .build()?;
    Ok(config)
}

/// Load config from a specific YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, SchedulerError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(env_source())
        .build()?;
    Ok(config)
}

/// Runtime settings for a [`Scheduler`](crate::Scheduler).
///
/// Read from the `[scheduler]` table of a config file, e.g.
///
/// ```toml
/// [scheduler]
/// worker_threads = 4
/// thread_name = "my-app-timers"
/// shutdown_timeout = "2s"
/// ```
///
/// Every key can be overridden with a `DEFERRED_SCHEDULER__<KEY>` environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Threads driving the timer loop.
    pub worker_threads: usize,
    /// Upper bound on threads executing timeout callbacks concurrently. Intervals
    /// always get a thread of their own.
    pub max_blocking_threads: usize,
    /// Name for runtime threads; interval threads are named `<thread_name>-interval-<id>`.
    pub thread_name: String,
    /// Grace period for in-flight callbacks on shutdown: "5s", "500ms" or plain millis.
    pub shutdown_timeout: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            max_blocking_threads: 512,
            thread_name: "deferred-worker".to_string(),
            shutdown_timeout: "5s".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Extract the `scheduler` table from a loaded config, falling back to defaults
    /// for anything it does not set.
    pub fn from_config(config: &Config) -> Result<Self, SchedulerError> {
        match config.get::<SchedulerConfig>(CONFIG_TABLE) {
            Ok(parsed) => Ok(parsed),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Settings taken from `DEFERRED_SCHEDULER__*` environment variables only.
    pub fn from_env() -> Result<Self, SchedulerError> {
        let config = Config::builder()
            .add_source(env_source())
            .build()?;
        Self::from_config(&config)
    }

    pub fn shutdown_timeout(&self) -> Result<Duration, SchedulerError> {
        TimeUnit::parse_millis(&self.shutdown_timeout)
            .map(Duration::from_millis)
            .ok_or_else(|| {
                SchedulerError::InvalidConfig(format!(
                    "invalid shutdown_timeout '{}'",
                    self.shutdown_timeout
                ))
            })
    }

    pub(crate) fn validate(&self) -> Result<(), SchedulerError> {
        if self.worker_threads == 0 {
            return Err(SchedulerError::InvalidConfig(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_blocking_threads == 0 {
            return Err(SchedulerError::InvalidConfig(
                "max_blocking_threads must be at least 1".to_string(),
            ));
        }
        self.shutdown_timeout()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(text: &str) -> Result<SchedulerConfig, SchedulerError> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        SchedulerConfig::from_config(&config)
    }

    #[test]
    fn missing_table_uses_defaults() {
        let parsed = from_toml("[other]\nkey = 1\n").unwrap();
        assert_eq!(parsed, SchedulerConfig::default());
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let parsed = from_toml("[scheduler]\nworker_threads = 4\nshutdown_timeout = \"250ms\"\n").unwrap();
        assert_eq!(parsed.worker_threads, 4);
        assert_eq!(parsed.thread_name, "deferred-worker");
        assert_eq!(parsed.shutdown_timeout().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn plain_number_timeout_is_millis() {
        let parsed = from_toml("[scheduler]\nshutdown_timeout = \"1500\"\n").unwrap();
        assert_eq!(parsed.shutdown_timeout().unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_workers = SchedulerConfig {
            worker_threads: 0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(zero_workers.validate(), Err(SchedulerError::InvalidConfig(_))));

        let bad_timeout = SchedulerConfig {
            shutdown_timeout: "soon".to_string(),
            ..SchedulerConfig::default()
        };
        assert!(matches!(bad_timeout.validate(), Err(SchedulerError::InvalidConfig(_))));
    }
}
