mod common;

use common::base_config;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use taskboard_core::{FormField, TaskStatus, TaskType};
use taskboard_test_utils::generators::{arb_task_status, arb_task_type};
use taskboard_tui::config::{AuthConfig, SourceKind, TuiConfig};
use taskboard_tui::keys::{map_form_key, map_key, Action, FormAction};
use taskboard_tui::state::FormState;
use taskboard_tui::theme::{priority_color, task_status_badge, task_status_color, Theme};

#[test]
fn config_http_requires_url_scheme() {
    let mut config = base_config();
    config.source = SourceKind::Http;
    config.api_base_url = Some("localhost:8080".to_string());
    assert!(config.validate().is_err());

    config.api_base_url = Some("http://localhost:8080".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_blank_auth() {
    let mut config = base_config();
    config.auth = AuthConfig {
        api_key: Some("  ".to_string()),
        jwt: None,
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.toml");
    std::fs::write(
        &path,
        r#"
source = "http"
api_base_url = "https://scheduler.internal"
request_timeout_ms = 2000
tick_rate_ms = 100
persistence_path = "tmp/state.json"
error_log_path = "tmp/taskboard.log"

[auth]
jwt = "token"

[queries]
tasks_refetch_interval_ms = 0
metrics_refetch_interval_ms = 5000
stale_time_ms = 1000
gc_time_ms = 60000

[mock]
tasks_delay_ms = 0
metrics_delay_ms = 0
"#,
    )
    .unwrap();

    let config = TuiConfig::from_path(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.source, SourceKind::Http);
    assert_eq!(config.auth.jwt.as_deref(), Some("token"));
    assert_eq!(config.tasks_query_options().stale_time.as_millis(), 1000);
}

#[test]
fn status_colors_follow_theme() {
    let theme = Theme::default();
    let expected = [
        (TaskStatus::Pending, theme.text_dim),
        (TaskStatus::Running, theme.primary),
        (TaskStatus::Completed, theme.success),
        (TaskStatus::Failed, theme.error),
    ];
    for (status, color) in expected {
        assert_eq!(task_status_color(status, &theme), color);
    }
}

#[test]
fn form_focus_cycles_through_fields() {
    let mut form = FormState::default();
    assert_eq!(form.focus, FormField::Name);
    form.focus_next();
    form.focus_next();
    assert_eq!(form.focus, FormField::Priority);
    form.focus_next();
    assert_eq!(form.focus, FormField::Name);
    form.focus_previous();
    assert_eq!(form.focus, FormField::Priority);
}

proptest! {
    #[test]
    fn zero_timing_values_rejected(field in 0usize..2) {
        let mut config = base_config();
        match field {
            0 => config.request_timeout_ms = 0,
            _ => config.tick_rate_ms = 0,
        }
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn query_intervals_always_accepted(
        tasks in 0u64..60_000,
        metrics in 0u64..60_000,
        stale in 0u64..60_000,
    ) {
        let mut config = base_config();
        config.queries.tasks_refetch_interval_ms = tasks;
        config.queries.metrics_refetch_interval_ms = metrics;
        config.queries.stale_time_ms = stale;
        prop_assert!(config.validate().is_ok());
        prop_assert_eq!(config.tasks_query_options().polls(), tasks > 0);
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY) {
        let key = if use_vim {
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)
        } else {
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)
        };
        prop_assert!(matches!(map_key(key), Some(Action::MoveDown)));
    }

    #[test]
    fn all_action_keys_mapped(key_char in "[qrnpjk]") {
        let ch = key_char.chars().next().unwrap();
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert!(map_key(event).is_some(), "Key '{}' should map to an action", ch);
    }

    #[test]
    fn key_release_ignored(key_char in "[a-z]") {
        let ch = key_char.chars().next().unwrap();
        let event = KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::empty(),
        };
        prop_assert!(map_key(event).is_none());
        prop_assert!(map_form_key(event).is_none());
    }

    #[test]
    fn form_printable_keys_are_input(ch in proptest::char::range('!', '~')) {
        let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        prop_assert_eq!(map_form_key(event), Some(FormAction::Input(ch)));
    }

    #[test]
    fn form_name_input_is_verbatim(name in "[a-zA-Z0-9 ]{0,24}") {
        let mut form = FormState::default();
        for c in name.chars() {
            form.input(c);
        }
        prop_assert_eq!(form.form.name, name);
    }

    #[test]
    fn priority_field_keeps_only_digits(text in "[a-z0-9]{0,8}") {
        let mut form = FormState::default();
        form.focus = FormField::Priority;
        form.form.priority.clear();
        for c in text.chars() {
            form.input(c);
        }
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        prop_assert_eq!(form.form.priority, digits);
    }

    #[test]
    fn type_cycle_round_trips(task_type in arb_task_type(), steps in 0usize..8) {
        let mut form = FormState::default();
        form.form.task_type = Some(task_type);
        for _ in 0..steps {
            form.cycle_type(true);
        }
        for _ in 0..steps {
            form.cycle_type(false);
        }
        prop_assert_eq!(form.form.task_type, Some(task_type));
        prop_assert!(TaskType::all().contains(&task_type));
    }

    #[test]
    fn status_badge_uses_status_color(status in arb_task_status()) {
        let theme = Theme::default();
        let badge = task_status_badge(status, &theme);
        let color = task_status_color(status, &theme);
        if status.is_terminal() {
            prop_assert_eq!(badge.bg, Some(color));
        } else {
            prop_assert_eq!(badge.fg, Some(color));
        }
    }

    #[test]
    fn priority_color_thresholds(priority in 1u8..=10) {
        let theme = Theme::default();
        let color = priority_color(priority, &theme);
        if priority >= 8 {
            prop_assert_eq!(color, theme.error);
        } else if priority >= 4 {
            prop_assert_eq!(color, theme.warning);
        } else {
            prop_assert_eq!(color, theme.text_dim);
        }
    }
}
