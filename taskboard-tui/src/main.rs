//! Taskboard dashboard entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use taskboard_tui::config::TuiConfig;
use taskboard_tui::error::TuiError;
use taskboard_tui::events::TuiEvent;
use taskboard_tui::keys::{map_form_key, map_key, Action};
use taskboard_tui::logging;
use taskboard_tui::notifications::NotificationLevel;
use taskboard_tui::persistence::{self, PersistedState};
use taskboard_tui::source::build_source;
use taskboard_tui::state::App;
use taskboard_tui::views::render_view;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config.error_log_path)?;
    let source = build_source(&config)?;
    let mut app = App::new(config, source);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => state.restore(&mut app),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "ignoring unreadable UI state"),
    }
    app.start()?;

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let mut ticker = tokio::time::interval(app.config.tick_rate());
    info!("dashboard started");

    loop {
        app.sync();
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event, &event_tx)? {
                    break;
                }
            }
        }
    }

    let persisted = PersistedState::capture(&app);
    if let Err(err) = persistence::save(&app.config.persistence_path, &persisted) {
        error!(error = %err, "failed to save UI state");
    }
    info!("dashboard stopped");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let event = match evt {
                    CrosstermEvent::Key(key) => TuiEvent::Input(key),
                    CrosstermEvent::Resize(width, height) => TuiEvent::Resize { width, height },
                    _ => continue,
                };
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_event(
    app: &mut App,
    event: TuiEvent,
    events: &mpsc::Sender<TuiEvent>,
) -> Result<bool, TuiError> {
    match event {
        TuiEvent::Input(key) if app.form.is_some() => {
            if let Some(action) = map_form_key(key) {
                app.handle_form_action(action, events);
            }
        }
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key) {
                return handle_action(app, action);
            }
        }
        TuiEvent::TaskCreated(outcome) => app.handle_task_created(outcome),
        TuiEvent::Resize { .. } => {}
    }
    Ok(false)
}

fn handle_action(app: &mut App, action: Action) -> Result<bool, TuiError> {
    match action {
        Action::Quit => return Ok(true),
        Action::MoveDown => app.select_next(),
        Action::MoveUp => app.select_previous(),
        Action::PauseUpdates => app.toggle_pause()?,
        Action::Refresh => {
            if let Err(err) = app.refresh() {
                app.notify(NotificationLevel::Error, format!("Refresh failed: {}", err));
            }
        }
        Action::NewTask => app.open_form(),
        Action::Cancel => app.notifications.clear(),
    }
    Ok(false)
}
