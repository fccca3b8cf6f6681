mod common;

use common::{base_config, buffer_text, ms, row_text};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;
use taskboard_core::FormField;
use taskboard_test_utils::fixtures::{dummy_metrics, dummy_tasks};
use taskboard_tui::events::TuiEvent;
use taskboard_tui::keys::FormAction;
use taskboard_tui::notifications::NotificationLevel;
use taskboard_tui::persistence::{self, PersistedState};
use taskboard_tui::source::{MockTaskSource, TaskSource};
use taskboard_tui::state::App;
use taskboard_tui::views::{self, metrics, tasks::LOADING_TEXT};
use tokio::sync::mpsc;

fn mock_app() -> (App, Arc<MockTaskSource>) {
    let source = Arc::new(MockTaskSource::new(ms(1_000), ms(500)));
    let shared: Arc<dyn TaskSource> = source.clone();
    (App::new(base_config(), shared), source)
}

fn render_dashboard(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| views::render_view(f, app)).unwrap();
    buffer_text(terminal.backend().buffer())
}

/// Values on the card row, left to right.
fn metric_values(app: &App) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(80, metrics::HEIGHT)).unwrap();
    terminal
        .draw(|f| metrics::render(f, app, f.size()))
        .unwrap();
    row_text(terminal.backend().buffer(), 1)
        .split('│')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn type_text(app: &mut App, events: &mpsc::Sender<TuiEvent>, text: &str) {
    for c in text.chars() {
        app.handle_form_action(FormAction::Input(c), events);
    }
}

#[tokio::test(start_paused = true)]
async fn mock_source_starts_from_fixtures() {
    let source = MockTaskSource::new(ms(0), ms(0));
    assert_eq!(source.snapshot(), dummy_tasks());
    assert_eq!(source.fetch_metrics().await.unwrap(), dummy_metrics());
}

#[tokio::test(start_paused = true)]
async fn dashboard_shows_loading_then_tasks() {
    let (mut app, _source) = mock_app();
    app.start().unwrap();
    app.sync();

    assert!(app.queries.tasks.is_loading());
    assert!(render_dashboard(&app).contains(LOADING_TEXT));
    assert_eq!(metric_values(&app), vec!["▒▒▒"; 4]);

    tokio::time::sleep(ms(1_001)).await;
    assert!(app.sync());

    assert_eq!(app.tasks(), dummy_tasks().as_slice());
    let screen = render_dashboard(&app);
    assert!(!screen.contains(LOADING_TEXT));
    assert!(screen.contains("Send Welcome Email"));
    assert!(screen.contains("Database Maintenance"));
}

#[tokio::test(start_paused = true)]
async fn metric_cards_show_counts() {
    let (mut app, _source) = mock_app();
    app.start().unwrap();

    tokio::time::sleep(ms(501)).await;
    app.sync();

    let expected = dummy_metrics();
    assert_eq!(app.queries.metrics.data(), Some(&expected));
    assert_eq!(metric_values(&app), vec!["5", "1", "2", "1"]);
}

#[tokio::test(start_paused = true)]
async fn restored_selection_survives_load() {
    let (mut app, _source) = mock_app();
    app.selected_task = Some("ts_3".to_string());
    app.start().unwrap();

    tokio::time::sleep(ms(1_001)).await;
    app.sync();
    assert_eq!(app.selected_index(), Some(2));

    app.select_next();
    app.select_next();
    app.select_next();
    assert_eq!(app.selected().map(|t| t.id.as_str()), Some("ts_5"));
    app.select_previous();
    assert_eq!(app.selected().map(|t| t.id.as_str()), Some("ts_4"));
}

#[tokio::test(start_paused = true)]
async fn missing_selection_falls_back_to_first_task() {
    let (mut app, _source) = mock_app();
    app.selected_task = Some("ts_99".to_string());
    app.start().unwrap();

    tokio::time::sleep(ms(1_001)).await;
    app.sync();
    assert_eq!(app.selected_task.as_deref(), Some("ts_1"));
}

#[tokio::test(start_paused = true)]
async fn short_name_is_rejected_before_the_source() {
    let (mut app, source) = mock_app();
    let (tx, mut rx) = mpsc::channel(8);

    app.open_form();
    type_text(&mut app, &tx, "ab");
    app.handle_form_action(FormAction::Submit, &tx);

    let form = app.form.as_ref().unwrap();
    assert_eq!(
        form.error_for(FormField::Name),
        Some("Task name must be at least 3 characters.")
    );
    assert!(!form.submitting);

    tokio::task::yield_now().await;
    assert_eq!(source.create_calls(), 0);
    assert!(rx.try_recv().is_err());

    let screen = render_dashboard(&app);
    assert!(screen.contains("Task name must be at least 3 characters."));
}

#[tokio::test(start_paused = true)]
async fn created_task_appears_after_invalidation() {
    let (mut app, source) = mock_app();
    let (tx, mut rx) = mpsc::channel(8);
    app.start().unwrap();
    tokio::time::sleep(ms(1_001)).await;
    app.sync();
    assert_eq!(app.tasks().len(), 5);

    app.open_form();
    type_text(&mut app, &tx, "Rotate Keys");
    assert!(app.submit_form(&tx));
    assert!(app.form.as_ref().unwrap().submitting);

    let Some(TuiEvent::TaskCreated(outcome)) = rx.recv().await else {
        panic!("expected a task-created event");
    };
    let created = outcome.unwrap();
    assert_eq!(created.name, "Rotate Keys");
    assert_eq!(source.create_calls(), 1);

    app.handle_task_created(Ok(created));
    assert!(app.form.is_none());
    let last = app.notifications.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Success);
    assert_eq!(last.message, "Task \"Rotate Keys\" created.");

    tokio::time::sleep(ms(1_001)).await;
    app.sync();
    assert_eq!(app.tasks().len(), 6);
    assert_eq!(app.tasks()[5].id, "ts_6");
    assert_eq!(app.queries.metrics.data().map(|m| m.total_tasks), Some(6));
}

#[tokio::test(start_paused = true)]
async fn create_outcome_dropped_after_event_loop_exits() {
    let (mut app, source) = mock_app();
    let (tx, rx) = mpsc::channel(8);
    drop(rx);

    app.open_form();
    type_text(&mut app, &tx, "Rotate Keys");
    assert!(app.submit_form(&tx));
    tokio::time::sleep(ms(10)).await;

    assert_eq!(source.create_calls(), 1);
    assert!(app.form.as_ref().unwrap().submitting);
}

#[tokio::test(start_paused = true)]
async fn failed_create_keeps_form_open() {
    let (mut app, _source) = mock_app();
    app.open_form();
    if let Some(form) = app.form.as_mut() {
        form.submitting = true;
    }

    app.handle_task_created(Err("HTTP 500".to_string()));

    let form = app.form.as_ref().unwrap();
    assert!(!form.submitting);
    let last = app.notifications.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Failed to create task: HTTP 500");
}

#[tokio::test(start_paused = true)]
async fn fetch_error_is_rendered() {
    let (mut app, source) = mock_app();
    source.set_failure(Some("network down"));
    app.start().unwrap();

    tokio::time::sleep(ms(1_001)).await;
    app.sync();
    assert!(!app.queries.tasks.is_loading());
    assert!(render_dashboard(&app).contains("Error fetching tasks: network down"));

    source.set_failure(None);
    app.refresh().unwrap();
    tokio::time::sleep(ms(1_001)).await;
    app.sync();
    assert_eq!(app.tasks().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn refresh_failure_keeps_rows() {
    let (mut app, source) = mock_app();
    app.start().unwrap();
    tokio::time::sleep(ms(1_001)).await;
    app.sync();

    source.set_failure(Some("network down"));
    app.refresh().unwrap();
    tokio::time::sleep(ms(1_001)).await;
    app.sync();

    let entry = app.queries.tasks.snapshot().unwrap();
    assert!(entry.is_error());
    assert_eq!(entry.error_message(), Some("network down"));
    assert_eq!(app.tasks().len(), 5);

    let screen = render_dashboard(&app);
    assert!(screen.contains("refresh failed: network down"));
    assert!(screen.contains("Send Welcome Email"));
}

#[tokio::test(start_paused = true)]
async fn pause_stops_polling_until_resumed() {
    let (mut app, _source) = mock_app();
    app.start().unwrap();

    tokio::time::sleep(ms(6_000)).await;
    app.sync();
    assert_eq!(app.queries.metrics.cache().stats().fetches, 2);

    app.toggle_pause().unwrap();
    assert!(app.updates_paused);
    assert!(!app.queries.metrics.is_attached());
    tokio::time::sleep(ms(20_000)).await;
    assert!(!app.sync());
    assert_eq!(app.queries.metrics.cache().stats().fetches, 2);
    assert!(render_dashboard(&app).contains("PAUSED"));

    // Refresh is refused while paused.
    app.refresh().unwrap();
    assert_eq!(
        app.notifications.last().map(|n| n.level),
        Some(NotificationLevel::Warning)
    );

    app.toggle_pause().unwrap();
    assert!(app.queries.metrics.is_attached());
    tokio::time::sleep(ms(501)).await;
    assert_eq!(app.queries.metrics.cache().stats().fetches, 3);
}

#[tokio::test(start_paused = true)]
async fn selection_restored_from_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.json");

    let (mut first, _source) = mock_app();
    first.start().unwrap();
    tokio::time::sleep(ms(1_001)).await;
    first.sync();
    first.select_next();
    first.select_next();
    persistence::save(&path, &PersistedState::capture(&first)).unwrap();

    let (mut second, _source) = mock_app();
    persistence::load(&path).unwrap().unwrap().restore(&mut second);
    second.start().unwrap();
    tokio::time::sleep(ms(1_001)).await;
    second.sync();
    assert_eq!(second.selected().map(|t| t.id.as_str()), Some("ts_3"));
}

#[test]
fn persisted_selection_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("taskboard.json");

    assert_eq!(persistence::load(&path).unwrap(), None);

    let state = PersistedState {
        selected_task_id: Some("ts_2".to_string()),
    };
    persistence::save(&path, &state).unwrap();
    assert_eq!(persistence::load(&path).unwrap(), Some(state));

    std::fs::write(&path, "not json").unwrap();
    assert!(persistence::load(&path).is_err());
}
