//! Configuration loading for the Taskboard dashboard.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskboard_cache::{CacheConfig, QueryOptions};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub source: SourceKind,
    /// Required when `source = "http"`.
    pub api_base_url: Option<String>,
    pub auth: AuthConfig,
    pub request_timeout_ms: u64,
    pub queries: QueryConfig,
    pub mock: MockConfig,
    pub tick_rate_ms: u64,
    pub persistence_path: PathBuf,
    pub error_log_path: PathBuf,
}

/// Where task data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mock,
    Http,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub jwt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Zero disables polling of the task list.
    pub tasks_refetch_interval_ms: u64,
    pub metrics_refetch_interval_ms: u64,
    pub stale_time_ms: u64,
    pub gc_time_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    pub tasks_delay_ms: u64,
    pub metrics_delay_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or TASKBOARD_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source == SourceKind::Http {
            let url = self.api_base_url.as_deref().unwrap_or_default().trim();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "api_base_url",
                    reason: "required when source is \"http\"".to_string(),
                });
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "api_base_url",
                    reason: "must start with http:// or https://".to_string(),
                });
            }
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.error_log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "error_log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(key) = &self.auth.api_key {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "auth.api_key",
                    reason: "must not be blank when set".to_string(),
                });
            }
        }
        if let Some(jwt) = &self.auth.jwt {
            if jwt.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "auth.jwt",
                    reason: "must not be blank when set".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().with_gc_time(Duration::from_millis(self.queries.gc_time_ms))
    }

    pub fn tasks_query_options(&self) -> QueryOptions {
        QueryOptions::new()
            .with_refetch_interval(Duration::from_millis(self.queries.tasks_refetch_interval_ms))
            .with_stale_time(Duration::from_millis(self.queries.stale_time_ms))
    }

    pub fn metrics_query_options(&self) -> QueryOptions {
        QueryOptions::new()
            .with_refetch_interval(Duration::from_millis(self.queries.metrics_refetch_interval_ms))
            .with_stale_time(Duration::from_millis(self.queries.stale_time_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("TASKBOARD_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
source = "mock"
request_timeout_ms = 5000
tick_rate_ms = 250
persistence_path = "tmp/taskboard-state.json"
error_log_path = "tmp/taskboard.log"

[auth]

[queries]
tasks_refetch_interval_ms = 0
metrics_refetch_interval_ms = 5000
stale_time_ms = 0
gc_time_ms = 300000

[mock]
tasks_delay_ms = 1000
metrics_delay_ms = 500
"#;

    #[test]
    fn test_parse_sample() {
        let config = TuiConfig::from_toml_str(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.source, SourceKind::Mock);
        assert!(!config.tasks_query_options().polls());
        assert_eq!(
            config.metrics_query_options().refetch_interval,
            Duration::from_millis(5000)
        );
        assert_eq!(config.cache_config().gc_time, Duration::from_secs(300));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let contents = format!("{}\nunexpected = true\n", SAMPLE);
        assert!(matches!(
            TuiConfig::from_toml_str(&contents),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_http_source_requires_base_url() {
        let contents = SAMPLE.replace("source = \"mock\"", "source = \"http\"");
        let config = TuiConfig::from_toml_str(&contents).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "api_base_url", .. })
        ));
    }
}
