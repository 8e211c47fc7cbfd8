//! Scheduler messages
//!
//! Errors, plus the commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Priority, Task, TaskId};
use crate::heap::HeapError;

use super::queue::{AddOutcome, QueueState};

/// Errors from scheduler operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("No tasks scheduled")]
    EmptyCollection,

    #[error("Task not found: {0}")]
    UnknownIdentifier(TaskId),

    #[error("Task already scheduled: {0}")]
    DuplicateIdentifier(TaskId),

    #[error("Channel error")]
    ChannelError,
}

impl From<HeapError<TaskId>> for SchedulerError {
    fn from(err: HeapError<TaskId>) -> Self {
        match err {
            HeapError::EmptyCollection => Self::EmptyCollection,
            HeapError::UnknownIdentifier(id) => Self::UnknownIdentifier(id),
            HeapError::DuplicateIdentifier(id) => Self::DuplicateIdentifier(id),
        }
    }
}

/// Response from scheduler operations
pub type SchedulerResponse<T> = Result<T, SchedulerError>;

/// Commands sent to the scheduler actor
#[derive(Debug)]
pub enum SchedulerCommand {
    AddTask {
        task: Task,
        reply: oneshot::Sender<SchedulerResponse<AddOutcome>>,
    },
    ChangeTaskPriority {
        id: TaskId,
        priority: Priority,
        reply: oneshot::Sender<SchedulerResponse<Priority>>,
    },
    GetTask {
        reply: oneshot::Sender<SchedulerResponse<Task>>,
    },

    /// Park until a task is available
    NextTask {
        reply: oneshot::Sender<Task>,
    },

    Snapshot {
        reply: oneshot::Sender<Vec<Task>>,
    },
    State {
        reply: oneshot::Sender<QueueState>,
    },

    Shutdown,
}
