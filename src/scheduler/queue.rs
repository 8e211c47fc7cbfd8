//! Queue types for the scheduler

use serde::Serialize;

use crate::domain::Priority;

/// Result of adding a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New task entered the queue
    Inserted,

    /// Identifier was already live and its priority was replaced
    /// (only under `DuplicatePolicy::Update`)
    Updated { previous: Priority },
}

/// Statistics for the scheduler
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub total_added: u64,
    pub total_dispatched: u64,
    pub total_priority_changes: u64,
    pub total_rejected: u64,
    pub peak_depth: usize,
}

/// Queue state as seen through the actor
#[derive(Debug, Clone, Serialize)]
pub struct QueueState {
    /// Tasks waiting to be dispatched
    pub queued: usize,

    /// Callers parked in `next_task`
    pub waiting: usize,

    pub stats: SchedulerStats,
}
