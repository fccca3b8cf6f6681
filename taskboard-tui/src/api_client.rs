//! REST client for the scheduler's task API.

use crate::config::{AuthConfig, TuiConfig};
use crate::source::{SourceError, TaskSource};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use taskboard_core::{CreateTaskRequest, DashboardMetrics, Task};
use tracing::debug;

const TASKS_PATH: &str = "/api/v1/tasks";

/// `GET /tasks` answers either a bare array or `{"tasks": [...], "count": n}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskListBody {
    Bare(Vec<Task>),
    Envelope { tasks: Vec<Task> },
}

impl TaskListBody {
    fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskListBody::Bare(tasks) | TaskListBody::Envelope { tasks } => tasks,
        }
    }
}

/// [`TaskSource`] backed by `GET`/`POST {base}/api/v1/tasks`.
///
/// The API has no metrics endpoint; metrics are derived from the task list.
#[derive(Clone)]
pub struct HttpTaskSource {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl HttpTaskSource {
    pub fn new(config: &TuiConfig) -> Result<Self, SourceError> {
        let base_url = config
            .api_base_url
            .as_deref()
            .ok_or_else(|| SourceError::Config("api_base_url is not set".to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, SourceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.auth_header.clone())
            .send()
            .await?;
        parse_response(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, SourceError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }
}

#[async_trait]
impl TaskSource for HttpTaskSource {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, SourceError> {
        let body: TaskListBody = self.get_json(TASKS_PATH).await?;
        Ok(body.into_tasks())
    }

    async fn fetch_metrics(&self) -> Result<DashboardMetrics, SourceError> {
        let tasks = self.fetch_tasks().await?;
        Ok(DashboardMetrics::from_tasks(&tasks))
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, SourceError> {
        self.post_json(TASKS_PATH, request).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SourceError> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        return Ok(serde_json::from_str::<T>(&text)?);
    }
    Err(error_from_body(status.as_u16(), &text))
}

/// Turn a non-2xx body into an error carrying the server's message.
fn error_from_body(status: u16, text: &str) -> SourceError {
    let message = text.trim();
    if message.is_empty() {
        return SourceError::InvalidResponse(format!("HTTP {}", status));
    }
    SourceError::InvalidResponse(format!("HTTP {}: {}", status, message))
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, SourceError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| SourceError::Config(e.to_string()))?,
        );
    }
    if let Some(jwt) = &auth.jwt {
        let value = format!("Bearer {}", jwt);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(|e| SourceError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}
