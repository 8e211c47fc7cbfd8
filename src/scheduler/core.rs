//! Scheduler implementation

use tracing::{debug, warn};

use crate::domain::{Priority, Task, TaskId};
use crate::heap::IndexedMaxHeap;

use super::config::{DuplicatePolicy, SchedulerConfig};
use super::messages::{SchedulerError, SchedulerResponse};
use super::queue::{AddOutcome, SchedulerStats};

/// The Scheduler hands out tasks highest priority first.
///
/// It is a task-shaped front for [`IndexedMaxHeap`]; all ordering lives in
/// the heap. Every method takes `&self`/`&mut self` and runs to completion,
/// so concurrent callers must share it through a single owner such as
/// [`SchedulerHandle`](super::SchedulerHandle).
#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    heap: IndexedMaxHeap<TaskId, Priority>,
    stats: SchedulerStats,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    /// Create a new scheduler with the given configuration
    pub fn new(config: SchedulerConfig) -> Self {
        debug!(?config, "Scheduler::new: called");
        Self {
            heap: IndexedMaxHeap::with_capacity(config.initial_capacity),
            config,
            stats: SchedulerStats::default(),
        }
    }

    /// Queue a task
    pub fn add_task(&mut self, task: Task) -> SchedulerResponse<AddOutcome> {
        debug!(id = %task.id, priority = %task.priority, "Scheduler::add_task: called");

        if self.heap.contains(&task.id) && self.config.duplicate_policy == DuplicatePolicy::Update {
            debug!(id = %task.id, "Scheduler::add_task: already queued, updating priority");
            let previous = self.change_task_priority(task.id, task.priority)?;
            return Ok(AddOutcome::Updated { previous });
        }

        match self.heap.insert(task.id, task.priority) {
            Ok(()) => {
                self.stats.total_added += 1;
                self.stats.peak_depth = self.stats.peak_depth.max(self.heap.len());
                Ok(AddOutcome::Inserted)
            }
            Err(e) => {
                warn!(id = %task.id, "Scheduler::add_task: already queued, rejecting");
                Err(self.rejected(e.into()))
            }
        }
    }

    /// Change the priority of a queued task, returning its previous priority
    pub fn change_task_priority(&mut self, id: TaskId, priority: Priority) -> SchedulerResponse<Priority> {
        debug!(%id, %priority, "Scheduler::change_task_priority: called");

        match self.heap.change_priority(&id, priority) {
            Ok(previous) => {
                self.stats.total_priority_changes += 1;
                debug!(%id, %previous, %priority, "Scheduler::change_task_priority: changed");
                Ok(previous)
            }
            Err(e) => {
                warn!(%id, "Scheduler::change_task_priority: unknown task");
                Err(self.rejected(e.into()))
            }
        }
    }

    /// Take the highest-priority task off the queue
    pub fn get_task(&mut self) -> SchedulerResponse<Task> {
        debug!("Scheduler::get_task: called");

        match self.heap.extract_max() {
            Ok(entry) => {
                self.stats.total_dispatched += 1;
                Ok(Task {
                    id: entry.identifier,
                    priority: entry.priority,
                })
            }
            Err(e) => {
                debug!("Scheduler::get_task: queue empty");
                Err(self.rejected(e.into()))
            }
        }
    }

    /// Put back a task that was dispatched but never delivered
    pub(crate) fn requeue(&mut self, task: Task) -> SchedulerResponse<()> {
        debug!(id = %task.id, "Scheduler::requeue: called");
        self.heap.insert(task.id, task.priority)?;
        self.stats.total_dispatched = self.stats.total_dispatched.saturating_sub(1);
        Ok(())
    }

    /// The task `get_task` would return next
    pub fn peek_task(&self) -> Option<Task> {
        self.heap.peek().map(|entry| Task {
            id: entry.identifier,
            priority: entry.priority,
        })
    }

    /// Current priority of a queued task
    pub fn priority_of(&self, id: TaskId) -> Option<Priority> {
        self.heap.priority_of(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.heap.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queued tasks in dispatch order of priority (ties by ascending id)
    pub fn snapshot(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .heap
            .iter()
            .map(|entry| Task {
                id: entry.identifier,
                priority: entry.priority,
            })
            .collect();
        tasks.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        tasks
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn rejected(&mut self, err: SchedulerError) -> SchedulerError {
        self.stats.total_rejected += 1;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler_with(tasks: &[(u64, i64)]) -> Scheduler {
        let mut scheduler = Scheduler::default();
        for &(id, priority) in tasks {
            scheduler.add_task(Task::new(id, priority)).unwrap();
        }
        scheduler
    }

    #[test]
    fn test_trace() {
        let mut scheduler = scheduler_with(&[(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);

        assert_eq!(scheduler.get_task(), Ok(Task::new(5, 50)));
        assert_eq!(scheduler.get_task(), Ok(Task::new(4, 40)));

        assert_eq!(scheduler.change_task_priority(TaskId(1), Priority(100)), Ok(Priority(10)));

        assert_eq!(scheduler.get_task(), Ok(Task::new(1, 100)));
        assert_eq!(scheduler.get_task(), Ok(Task::new(3, 30)));
    }

    #[test]
    fn test_get_from_empty() {
        let mut scheduler = Scheduler::default();

        assert_eq!(scheduler.get_task(), Err(SchedulerError::EmptyCollection));
        assert_eq!(scheduler.get_task(), Err(SchedulerError::EmptyCollection));
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.stats().total_rejected, 2);
    }

    #[test]
    fn test_change_unknown_task() {
        let mut scheduler = scheduler_with(&[(1, 10)]);

        assert_eq!(
            scheduler.change_task_priority(TaskId(2), Priority(5)),
            Err(SchedulerError::UnknownIdentifier(TaskId(2)))
        );
        assert_eq!(scheduler.priority_of(TaskId(1)), Some(Priority(10)));
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let mut scheduler = scheduler_with(&[(1, 10)]);

        assert_eq!(
            scheduler.add_task(Task::new(1, 99)),
            Err(SchedulerError::DuplicateIdentifier(TaskId(1)))
        );
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.priority_of(TaskId(1)), Some(Priority(10)));
        assert_eq!(scheduler.stats().total_rejected, 1);
    }

    #[test]
    fn test_duplicate_updates_under_update_policy() {
        let mut scheduler = Scheduler::new(SchedulerConfig {
            duplicate_policy: DuplicatePolicy::Update,
            ..Default::default()
        });
        scheduler.add_task(Task::new(1, 10)).unwrap();
        scheduler.add_task(Task::new(2, 20)).unwrap();

        assert_eq!(
            scheduler.add_task(Task::new(1, 30)),
            Ok(AddOutcome::Updated { previous: Priority(10) })
        );
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.get_task(), Ok(Task::new(1, 30)));

        let stats = scheduler.stats();
        assert_eq!(stats.total_added, 2);
        assert_eq!(stats.total_priority_changes, 1);
    }

    #[test]
    fn test_snapshot_sorted() {
        let scheduler = scheduler_with(&[(3, 5), (1, 9), (2, 5), (4, 1)]);

        let ids: Vec<u64> = scheduler.snapshot().iter().map(|t| t.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(scheduler.peek_task(), Some(Task::new(1, 9)));
        assert_eq!(scheduler.len(), 4);
    }

    #[test]
    fn test_requeue_restores_task() {
        let mut scheduler = scheduler_with(&[(1, 10), (2, 20)]);

        let task = scheduler.get_task().unwrap();
        scheduler.requeue(task).unwrap();

        assert!(scheduler.contains(TaskId(2)));
        assert_eq!(scheduler.stats().total_dispatched, 0);
        assert_eq!(scheduler.get_task(), Ok(Task::new(2, 20)));
    }

    #[test]
    fn test_stats_tracking() {
        let mut scheduler = scheduler_with(&[(1, 10), (2, 20), (3, 30)]);

        scheduler.get_task().unwrap();
        scheduler.change_task_priority(TaskId(1), Priority(50)).unwrap();
        scheduler.add_task(Task::new(4, 1)).unwrap();

        let stats = scheduler.stats();
        assert_eq!(stats.total_added, 4);
        assert_eq!(stats.total_dispatched, 1);
        assert_eq!(stats.total_priority_changes, 1);
        assert_eq!(stats.total_rejected, 0);
        assert_eq!(stats.peak_depth, 3);
    }
}
