//! Task-creation schema.
//!
//! [`CreateTaskForm`] holds raw user input. [`CreateTaskForm::validate`] is
//! the only way to obtain a [`CreateTaskRequest`], so a request that reaches
//! a task source has always passed the schema.

use crate::enums::TaskType;
use crate::error::{FieldError, FormField, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

const DEFAULT_PRIORITY: u8 = 5;

/// A validated request to create a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: u8,
}

/// Raw, unvalidated form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskForm {
    pub name: String,
    pub task_type: Option<TaskType>,
    pub priority: String,
}

impl Default for CreateTaskForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            task_type: Some(TaskType::Email),
            priority: DEFAULT_PRIORITY.to_string(),
        }
    }
}

impl CreateTaskForm {
    pub fn new(name: impl Into<String>, task_type: TaskType, priority: impl ToString) -> Self {
        Self {
            name: name.into(),
            task_type: Some(task_type),
            priority: priority.to_string(),
        }
    }

    /// Check every field and collect all violations.
    pub fn validate(&self) -> Result<CreateTaskRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.chars().count() < MIN_NAME_LEN {
            errors.push(FieldError::new(
                FormField::Name,
                format!("Task name must be at least {} characters.", MIN_NAME_LEN),
            ));
        }

        if self.task_type.is_none() {
            errors.push(FieldError::new(FormField::Type, "Select a task type."));
        }

        let priority = match self.priority.trim().parse::<i64>() {
            Ok(value) if value < MIN_PRIORITY as i64 => {
                errors.push(FieldError::new(
                    FormField::Priority,
                    format!("Priority must be at least {}.", MIN_PRIORITY),
                ));
                None
            }
            Ok(value) if value > MAX_PRIORITY as i64 => {
                errors.push(FieldError::new(
                    FormField::Priority,
                    format!("Priority must be at most {}.", MAX_PRIORITY),
                ));
                None
            }
            Ok(value) => Some(value as u8),
            Err(_) => {
                errors.push(FieldError::new(
                    FormField::Priority,
                    "Priority must be a whole number.",
                ));
                None
            }
        };

        match (self.task_type, priority) {
            (Some(task_type), Some(priority)) if errors.is_empty() => Ok(CreateTaskRequest {
                name: self.name.clone(),
                task_type,
                priority,
            }),
            _ => Err(errors),
        }
    }
}
