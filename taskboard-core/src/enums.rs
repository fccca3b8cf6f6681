//! Closed enumerations for task type and task status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Email,
    Notification,
    Report,
    Maintenance,
}

impl TaskType {
    pub fn all() -> &'static [TaskType] {
        &[
            TaskType::Email,
            TaskType::Notification,
            TaskType::Report,
            TaskType::Maintenance,
        ]
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Email => "email",
            TaskType::Notification => "notification",
            TaskType::Report => "report",
            TaskType::Maintenance => "maintenance",
        }
    }

    /// Next variant in declaration order, wrapping around.
    pub fn next(&self) -> TaskType {
        let all = Self::all();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Previous variant in declaration order, wrapping around.
    pub fn previous(&self) -> TaskType {
        let all = Self::all();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a task as reported by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pending,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ]
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Check if the task has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
