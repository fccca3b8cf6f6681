//! Task records and the aggregate metrics derived from them.

use crate::enums::{TaskStatus, TaskType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Opaque, unique task identifier (e.g. `ts_1`).
pub type TaskId = String;

/// A scheduled unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    /// 1 (lowest) through 10 (highest).
    pub priority: u8,
    pub retries: u32,
    pub created_at: Timestamp,
}

/// Headline numbers shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_tasks: u32,
    pub running: u32,
    pub completed_today: u32,
    pub failed: u32,
}

impl DashboardMetrics {
    /// Derive metrics by counting task statuses.
    ///
    /// `completed_today` counts every completed task; the task record does
    /// not carry a completion timestamp.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count() as u32;
        Self {
            total_tasks: tasks.len() as u32,
            running: count(TaskStatus::Running),
            completed_today: count(TaskStatus::Completed),
            failed: count(TaskStatus::Failed),
        }
    }
}
