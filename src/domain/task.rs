//! The task record handed to and returned from the scheduler

use serde::{Deserialize, Serialize};

use super::{Priority, TaskId};

/// A schedulable unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub priority: Priority,
}

impl Task {
    /// Create a new task
    pub fn new(id: u64, priority: i64) -> Self {
        Self {
            id: TaskId(id),
            priority: Priority(priority),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task {} (priority {})", self.id, self.priority)
    }
}
