//! Replay scripts
//!
//! A script is an ordered list of scheduler operations, written in YAML or
//! JSON:
//!
//! ```yaml
//! ops:
//!   - { op: add, id: 1, priority: 10 }
//!   - { op: change, id: 1, priority: 100 }
//!   - { op: get }
//!   - { op: drain }
//! ```
//!
//! Replaying drives a [`SchedulerHandle`] and records what came out. A failed
//! operation is recorded and the replay carries on.

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Priority, Task, TaskId};
use crate::scheduler::{SchedulerError, SchedulerHandle, SchedulerStats};

/// One scripted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Op {
    Add { id: TaskId, priority: Priority },
    Change { id: TaskId, priority: Priority },
    Get,
    /// Get until the queue is empty
    Drain,
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add { id, priority } => write!(f, "add {} @ {}", id, priority),
            Self::Change { id, priority } => write!(f, "change {} -> {}", id, priority),
            Self::Get => write!(f, "get"),
            Self::Drain => write!(f, "drain"),
        }
    }
}

/// A replayable list of operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub ops: Vec<Op>,
}

impl Script {
    /// Load a script, as JSON if the extension is `.json` and YAML otherwise
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context(format!("Failed to read script {}", path.display()))?;

        let script = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).context("Failed to parse JSON script")?
        } else {
            Self::from_yaml(&content)?
        };

        debug!(path = %path.display(), ops = script.ops.len(), "Script::load: loaded");
        Ok(script)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML script")
    }
}

/// An operation the scheduler refused
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpFailure {
    /// Position of the op in the script
    pub index: usize,
    pub op: Op,
    pub error: String,
}

/// What a replay produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptReport {
    /// Tasks in the order they were dispatched
    pub dispatched: Vec<Task>,

    pub failures: Vec<OpFailure>,

    /// Tasks still queued after the last op, highest priority first
    pub remaining: Vec<Task>,

    pub stats: SchedulerStats,
}

/// Run every op of `script` against `handle`
///
/// Only a dead scheduler actor aborts the replay.
pub async fn replay(handle: &SchedulerHandle, script: &Script) -> Result<ScriptReport, SchedulerError> {
    info!(ops = script.ops.len(), "replay: starting");
    let mut report = ScriptReport::default();

    for (index, op) in script.ops.iter().enumerate() {
        debug!(index, %op, "replay: applying");
        let result = match *op {
            Op::Add { id, priority } => handle.add_task(Task { id, priority }).await.map(|_| ()),
            Op::Change { id, priority } => handle.change_task_priority(id, priority).await.map(|_| ()),
            Op::Get => handle.get_task().await.map(|task| report.dispatched.push(task)),
            Op::Drain => drain(handle, &mut report.dispatched).await,
        };

        match result {
            Ok(()) => {}
            Err(SchedulerError::ChannelError) => return Err(SchedulerError::ChannelError),
            Err(e) => {
                debug!(index, %op, error = %e, "replay: op failed");
                report.failures.push(OpFailure {
                    index,
                    op: *op,
                    error: e.to_string(),
                });
            }
        }
    }

    report.remaining = handle.snapshot().await?;
    report.stats = handle.stats().await?;
    info!(
        dispatched = report.dispatched.len(),
        failures = report.failures.len(),
        "replay: finished"
    );
    Ok(report)
}

/// Stops on queue depth rather than on a failed get, so a drain never shows
/// up in `total_rejected`
async fn drain(handle: &SchedulerHandle, dispatched: &mut Vec<Task>) -> Result<(), SchedulerError> {
    while handle.len().await? > 0 {
        dispatched.push(handle.get_task().await?);
    }
    Ok(())
}
