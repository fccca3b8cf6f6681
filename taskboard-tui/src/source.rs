//! Task sources: where the dashboard's data comes from.

use crate::api_client::HttpTaskSource;
use crate::config::{SourceKind, TuiConfig};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use taskboard_cache::ProducerError;
use taskboard_core::{sample_tasks, CreateTaskRequest, DashboardMetrics, Task, TaskStatus};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("{0}")]
    Unavailable(String),
}

impl From<SourceError> for ProducerError {
    fn from(err: SourceError) -> Self {
        match err {
            // Keep the collaborator's own message so the UI shows it verbatim.
            SourceError::Unavailable(message) => ProducerError::new(message),
            other => ProducerError::new(other.to_string()),
        }
    }
}

/// Collaborator that lists, summarizes and creates tasks.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, SourceError>;

    async fn fetch_metrics(&self) -> Result<DashboardMetrics, SourceError>;

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, SourceError>;
}

/// Build the source selected by `config.source`.
pub fn build_source(config: &TuiConfig) -> Result<Arc<dyn TaskSource>, SourceError> {
    let source: Arc<dyn TaskSource> = match config.source {
        SourceKind::Mock => Arc::new(MockTaskSource::new(
            Duration::from_millis(config.mock.tasks_delay_ms),
            Duration::from_millis(config.mock.metrics_delay_ms),
        )),
        SourceKind::Http => Arc::new(HttpTaskSource::new(config)?),
    };
    info!(source = ?config.source, "task source ready");
    Ok(source)
}

// ============================================================================
// MOCK SOURCE
// ============================================================================

/// In-memory source that answers after a fixed delay.
///
/// [`MockTaskSource::new`] starts from [`sample_tasks`].
#[derive(Debug)]
pub struct MockTaskSource {
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicU64,
    tasks_delay: Duration,
    metrics_delay: Duration,
    failure: Mutex<Option<String>>,
    create_calls: AtomicUsize,
}

impl MockTaskSource {
    pub fn new(tasks_delay: Duration, metrics_delay: Duration) -> Self {
        Self::with_tasks(sample_tasks(), tasks_delay, metrics_delay)
    }

    pub fn with_tasks(tasks: Vec<Task>, tasks_delay: Duration, metrics_delay: Duration) -> Self {
        let next_id = tasks.len() as u64 + 1;
        Self {
            tasks: Mutex::new(tasks),
            next_id: AtomicU64::new(next_id),
            tasks_delay,
            metrics_delay,
            failure: Mutex::new(None),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Make every call fail with `message` until cleared with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = message.map(str::to_string);
    }

    /// Number of `create_task` calls received, valid or not.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_failure(&self) -> Result<(), SourceError> {
        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(message) => Err(SourceError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, SourceError> {
        tokio::time::sleep(self.tasks_delay).await;
        self.check_failure()?;
        Ok(self.snapshot())
    }

    async fn fetch_metrics(&self) -> Result<DashboardMetrics, SourceError> {
        tokio::time::sleep(self.metrics_delay).await;
        self.check_failure()?;
        Ok(DashboardMetrics::from_tasks(&self.snapshot()))
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, SourceError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task {
            id: format!("ts_{}", id),
            name: request.name.clone(),
            task_type: request.task_type,
            status: TaskStatus::Pending,
            priority: request.priority,
            retries: 0,
            created_at: Utc::now(),
        };
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.clone());
        debug!(task_id = %task.id, "mock task created");
        Ok(task)
    }
}
