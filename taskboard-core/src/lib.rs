//! Taskboard Core - Domain Types
//!
//! Pure data structures shared by the cache, the dashboard client and the
//! test utilities. Validation of task-creation input lives here as well so
//! that every caller enforces the same schema.

pub mod enums;
pub mod error;
pub mod form;
pub mod sample;
pub mod task;

pub use enums::{TaskStatus, TaskType};
pub use error::{FieldError, FormField, ValidationErrors};
pub use form::{CreateTaskForm, CreateTaskRequest, MAX_PRIORITY, MIN_NAME_LEN, MIN_PRIORITY};
pub use sample::sample_tasks;
pub use task::{DashboardMetrics, Task, TaskId, Timestamp};
