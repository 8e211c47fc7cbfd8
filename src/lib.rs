//! taskheap - priority task scheduler on an indexed binary max-heap
//!
//! Tasks are queued with a caller-assigned identifier and a numeric priority.
//! The highest priority is always dispatched first, and the priority of any
//! queued task can be raised or lowered by identifier in O(log n).
//!
//! # Modules
//!
//! - [`heap`] - `IndexedMaxHeap`, a max-heap with an identifier -> position index
//! - [`scheduler`] - Task-shaped `Scheduler` facade and the `SchedulerHandle` actor
//! - [`domain`] - `Task`, `TaskId` and `Priority`
//! - [`script`] - Replayable operation scripts
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod heap;
pub mod scheduler;
pub mod script;

// Re-export commonly used types
pub use config::{Config, OutputConfig};
pub use domain::{Priority, Task, TaskId};
pub use heap::{Entry, HeapError, IndexedMaxHeap};
pub use scheduler::{
    AddOutcome, DuplicatePolicy, QueueState, Scheduler, SchedulerConfig, SchedulerError, SchedulerHandle,
    SchedulerResponse, SchedulerStats,
};
pub use script::{Op, Script, ScriptReport, replay};
