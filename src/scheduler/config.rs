//! Scheduler configuration

use serde::{Deserialize, Serialize};

/// What `add_task` does with an identifier that is already scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateIdentifier` and leave the queue untouched
    #[default]
    Reject,

    /// Treat the add as a priority change of the live task
    Update,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Update => write!(f, "update"),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "update" => Ok(Self::Update),
            _ => Err(format!("Unknown duplicate policy: {}. Use: reject or update", s)),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Handling of re-added identifiers
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Entries to preallocate in the heap
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Bound of the actor's command channel
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

fn default_initial_capacity() -> usize {
    64
}

fn default_mailbox_capacity() -> usize {
    256
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            initial_capacity: 64,
            mailbox_capacity: 256,
        }
    }
}
