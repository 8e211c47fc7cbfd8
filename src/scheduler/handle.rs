//! SchedulerHandle - actor that owns the Scheduler
//!
//! The heap can't be touched half-way through a sift, so concurrent callers
//! never share it directly. One tokio task owns the [`Scheduler`] and applies
//! commands from a channel one at a time.

use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::{Priority, Task, TaskId};

use super::config::SchedulerConfig;
use super::core::Scheduler;
use super::messages::{SchedulerCommand, SchedulerError, SchedulerResponse};
use super::queue::{AddOutcome, QueueState, SchedulerStats};

/// Handle to send commands to the scheduler actor
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Spawn a new scheduler actor
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: SchedulerConfig) -> Self {
        debug!(?config, "SchedulerHandle::spawn: called");
        let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));

        tokio::spawn(actor_loop(Scheduler::new(config), rx));

        info!("Scheduler actor spawned");
        Self { tx }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> SchedulerCommand) -> SchedulerResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(command(reply_tx))
            .await
            .map_err(|_| SchedulerError::ChannelError)?;
        reply_rx.await.map_err(|_| SchedulerError::ChannelError)
    }

    /// Queue a task
    pub async fn add_task(&self, task: Task) -> SchedulerResponse<AddOutcome> {
        debug!(id = %task.id, "add_task: called");
        self.request(|reply| SchedulerCommand::AddTask { task, reply }).await?
    }

    /// Change the priority of a queued task
    pub async fn change_task_priority(&self, id: TaskId, priority: Priority) -> SchedulerResponse<Priority> {
        debug!(%id, %priority, "change_task_priority: called");
        self.request(|reply| SchedulerCommand::ChangeTaskPriority { id, priority, reply })
            .await?
    }

    /// Take the highest-priority task, failing if none is queued
    pub async fn get_task(&self) -> SchedulerResponse<Task> {
        debug!("get_task: called");
        self.request(|reply| SchedulerCommand::GetTask { reply }).await?
    }

    /// Take the highest-priority task, waiting for one if the queue is empty
    ///
    /// Waiters are served in the order they arrived. Dropping the returned
    /// future gives up the place in line; a task is never lost to a caller
    /// that went away.
    pub async fn next_task(&self) -> SchedulerResponse<Task> {
        debug!("next_task: called");
        self.request(|reply| SchedulerCommand::NextTask { reply }).await
    }

    /// Queued tasks, highest priority first
    pub async fn snapshot(&self) -> SchedulerResponse<Vec<Task>> {
        debug!("snapshot: called");
        self.request(|reply| SchedulerCommand::Snapshot { reply }).await
    }

    /// Current queue depth, waiter count and statistics
    pub async fn state(&self) -> SchedulerResponse<QueueState> {
        debug!("state: called");
        self.request(|reply| SchedulerCommand::State { reply }).await
    }

    pub async fn stats(&self) -> SchedulerResponse<SchedulerStats> {
        Ok(self.state().await?.stats)
    }

    pub async fn len(&self) -> SchedulerResponse<usize> {
        Ok(self.state().await?.queued)
    }

    /// Stop the actor. Parked `next_task` callers receive `ChannelError`.
    pub async fn shutdown(&self) -> SchedulerResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(SchedulerCommand::Shutdown)
            .await
            .map_err(|_| SchedulerError::ChannelError)
    }
}

async fn actor_loop(mut scheduler: Scheduler, mut rx: mpsc::Receiver<SchedulerCommand>) {
    let mut waiters: VecDeque<oneshot::Sender<Task>> = VecDeque::new();

    while let Some(command) = rx.recv().await {
        match command {
            SchedulerCommand::AddTask { task, reply } => {
                let _ = reply.send(scheduler.add_task(task));
                serve_waiters(&mut scheduler, &mut waiters);
            }
            SchedulerCommand::ChangeTaskPriority { id, priority, reply } => {
                let _ = reply.send(scheduler.change_task_priority(id, priority));
            }
            SchedulerCommand::GetTask { reply } => {
                let _ = reply.send(scheduler.get_task());
            }
            SchedulerCommand::NextTask { reply } => {
                park_waiter(&mut waiters, reply);
                serve_waiters(&mut scheduler, &mut waiters);
            }
            SchedulerCommand::Snapshot { reply } => {
                let _ = reply.send(scheduler.snapshot());
            }
            SchedulerCommand::State { reply } => {
                waiters.retain(|waiter| !waiter.is_closed());
                let _ = reply.send(QueueState {
                    queued: scheduler.len(),
                    waiting: waiters.len(),
                    stats: scheduler.stats().clone(),
                });
            }
            SchedulerCommand::Shutdown => {
                info!(queued = scheduler.len(), waiting = waiters.len(), "Scheduler actor shutting down");
                break;
            }
        }
    }

    debug!("actor_loop: exited");
}

/// Queue a `next_task` caller, dropping any that already gave up
fn park_waiter(waiters: &mut VecDeque<oneshot::Sender<Task>>, reply: oneshot::Sender<Task>) {
    waiters.retain(|waiter| !waiter.is_closed());
    waiters.push_back(reply);
}

/// Hand queued tasks to parked `next_task` callers, oldest first
fn serve_waiters(scheduler: &mut Scheduler, waiters: &mut VecDeque<oneshot::Sender<Task>>) {
    while !scheduler.is_empty() {
        let Some(waiter) = waiters.pop_front() else {
            break;
        };
        if waiter.is_closed() {
            debug!("serve_waiters: skipping abandoned waiter");
            continue;
        }

        match scheduler.get_task() {
            Ok(task) => {
                if let Err(task) = waiter.send(task) {
                    debug!(id = %task.id, "serve_waiters: waiter gone, requeueing");
                    if let Err(e) = scheduler.requeue(task) {
                        warn!(id = %task.id, error = %e, "serve_waiters: failed to requeue task");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "serve_waiters: queue drained unexpectedly");
                waiters.push_front(waiter);
                break;
            }
        }
    }
}
