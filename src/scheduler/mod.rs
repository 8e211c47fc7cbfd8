//! Priority task scheduler
//!
//! [`Scheduler`] hands out tasks highest priority first and lets callers
//! re-prioritise queued tasks by identifier. [`SchedulerHandle`] wraps it in
//! a single-owner actor for use from concurrent tasks.

mod config;
mod core;
mod handle;
mod messages;
mod queue;

pub use config::{DuplicatePolicy, SchedulerConfig};
pub use self::core::Scheduler;
pub use handle::SchedulerHandle;
pub use messages::{SchedulerCommand, SchedulerError, SchedulerResponse};
pub use queue::{AddOutcome, QueueState, SchedulerStats};
