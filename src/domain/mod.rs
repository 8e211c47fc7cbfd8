//! Domain types for taskheap
//!
//! Core domain types: TaskId, Priority, Task.

mod id;
mod priority;
mod task;

pub use id::TaskId;
pub use priority::Priority;
pub use task::Task;
