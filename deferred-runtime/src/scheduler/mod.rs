mod builder;
mod interval;
mod scheduler;
mod timeout;

pub use builder::SchedulerBuilder;
pub use scheduler::Scheduler;
