use ratatui::buffer::Buffer;
use std::time::Duration;
use taskboard_tui::config::{AuthConfig, MockConfig, QueryConfig, SourceKind, TuiConfig};

pub fn base_config() -> TuiConfig {
    TuiConfig {
        source: SourceKind::Mock,
        api_base_url: None,
        auth: AuthConfig::default(),
        request_timeout_ms: 5_000,
        queries: QueryConfig {
            tasks_refetch_interval_ms: 0,
            metrics_refetch_interval_ms: 5_000,
            stale_time_ms: 0,
            gc_time_ms: 300_000,
        },
        mock: MockConfig {
            tasks_delay_ms: 1_000,
            metrics_delay_ms: 500,
        },
        tick_rate_ms: 250,
        persistence_path: "tmp/taskboard-state.json".into(),
        error_log_path: "tmp/taskboard.log".into(),
    }
}

#[allow(dead_code)]
pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[allow(dead_code)]
pub fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width).map(|x| buffer.get(x, y).symbol()).collect()
}

#[allow(dead_code)]
pub fn buffer_text(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|y| row_text(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}
