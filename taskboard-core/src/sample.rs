//! Sample task data.
//!
//! The offline task source starts from these records and the test fixtures
//! reuse them, so both always describe the same board.

use crate::enums::{TaskStatus, TaskType};
use crate::task::{Task, Timestamp};
use chrono::{TimeZone, Utc};

fn at(hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 9, 1, hour, minute, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn task(
    id: &str,
    name: &str,
    task_type: TaskType,
    status: TaskStatus,
    priority: u8,
    retries: u32,
    created_at: Timestamp,
) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        task_type,
        status,
        priority,
        retries,
        created_at,
    }
}

/// Five tasks covering every status: two completed, one running, one
/// pending and one failed.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        task("ts_1", "Send Welcome Email", TaskType::Email, TaskStatus::Completed, 5, 0, at(10, 0)),
        task("ts_2", "Generate Daily Report", TaskType::Report, TaskStatus::Running, 8, 1, at(11, 0)),
        task(
            "ts_3",
            "Push Notification Campaign",
            TaskType::Notification,
            TaskStatus::Pending,
            3,
            0,
            at(11, 30),
        ),
        task("ts_4", "Database Maintenance", TaskType::Maintenance, TaskStatus::Failed, 10, 3, at(9, 0)),
        task("ts_5", "Send Password Reset", TaskType::Email, TaskStatus::Completed, 9, 0, at(11, 45)),
    ]
}
