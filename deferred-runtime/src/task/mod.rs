mod id;
mod output;
pub(crate) mod runner;

pub use id::TaskId;
pub(crate) use id::IdAllocator;
pub use output::TaskOutput;

/// Which engine a task belongs to, for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskKind {
    Timeout,
    Interval,
}

impl TaskKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            TaskKind::Timeout => "timeout",
            TaskKind::Interval => "interval",
        }
    }
}
