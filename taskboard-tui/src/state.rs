//! Application state.

use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::keys::FormAction;
use crate::notifications::{Notification, NotificationLevel};
use crate::queries::DashboardQueries;
use crate::source::TaskSource;
use crate::theme::Theme;
use std::sync::Arc;
use taskboard_cache::CacheError;
use taskboard_core::{CreateTaskForm, FormField, Task, TaskId, TaskType, ValidationErrors};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const MAX_NOTIFICATIONS: usize = 50;

/// The create-task modal.
#[derive(Debug, Clone)]
pub struct FormState {
    pub form: CreateTaskForm,
    pub focus: FormField,
    pub errors: Option<ValidationErrors>,
    /// A create call is in flight; further submits are ignored.
    pub submitting: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            form: CreateTaskForm::default(),
            focus: FormField::Name,
            errors: None,
            submitting: false,
        }
    }
}

impl FormState {
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Type,
            FormField::Type => FormField::Priority,
            FormField::Priority => FormField::Name,
        };
    }

    pub fn focus_previous(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Priority,
            FormField::Type => FormField::Name,
            FormField::Priority => FormField::Type,
        };
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::Name => self.form.name.push(c),
            FormField::Priority => {
                if c.is_ascii_digit() || c == '-' {
                    self.form.priority.push(c);
                }
            }
            FormField::Type => match c {
                ' ' | 'l' => self.cycle_type(true),
                'h' => self.cycle_type(false),
                _ => {}
            },
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Name => {
                self.form.name.pop();
            }
            FormField::Priority => {
                self.form.priority.pop();
            }
            FormField::Type => self.form.task_type = None,
        }
    }

    pub fn cycle_type(&mut self, forward: bool) {
        let current = self.form.task_type;
        self.form.task_type = Some(match (current, forward) {
            (Some(t), true) => t.next(),
            (Some(t), false) => t.previous(),
            (None, _) => TaskType::Email,
        });
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.as_ref().and_then(|e| e.message_for(field))
    }
}

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub source: Arc<dyn TaskSource>,
    pub queries: DashboardQueries,
    pub selected_task: Option<TaskId>,
    pub form: Option<FormState>,
    pub notifications: Vec<Notification>,
    pub updates_paused: bool,
}

impl App {
    pub fn new(config: TuiConfig, source: Arc<dyn TaskSource>) -> Self {
        let queries = DashboardQueries::new(&config, Arc::clone(&source));
        Self {
            config,
            theme: Theme::dashboard(),
            source,
            queries,
            selected_task: None,
            form: None,
            notifications: Vec::new(),
            updates_paused: false,
        }
    }

    /// Subscribe to both queries. Must run inside a Tokio runtime.
    pub fn start(&mut self) -> Result<(), CacheError> {
        self.queries.attach()
    }

    /// Pull fresh snapshots unless paused. Returns true if anything changed.
    pub fn sync(&mut self) -> bool {
        if self.updates_paused {
            return false;
        }
        let changed = self.queries.sync();
        if changed {
            self.reconcile_selection();
        }
        changed
    }

    pub fn tasks(&self) -> &[Task] {
        self.queries.tasks.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_task.as_ref()?;
        self.tasks().iter().position(|t| &t.id == selected)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected_index().map(|i| &self.tasks()[i])
    }

    pub fn select_next(&mut self) {
        let next = match self.selected_index() {
            Some(i) if i + 1 < self.tasks().len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.select_index(next);
    }

    pub fn select_previous(&mut self) {
        let previous = match self.selected_index() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select_index(previous);
    }

    fn select_index(&mut self, index: usize) {
        if let Some(task) = self.tasks().get(index) {
            self.selected_task = Some(task.id.clone());
        }
    }

    /// Keep a restored or previous selection only if the task still exists.
    fn reconcile_selection(&mut self) {
        if self.queries.tasks.data().is_none() {
            return;
        }
        if self.selected_index().is_none() {
            self.selected_task = self.tasks().first().map(|t| t.id.clone());
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Pause drops both subscriptions, which stops polling; resume
    /// re-subscribes and picks up whatever is stale.
    pub fn toggle_pause(&mut self) -> Result<(), CacheError> {
        self.updates_paused = !self.updates_paused;
        if self.updates_paused {
            self.queries.detach();
            self.notify(NotificationLevel::Info, "Updates paused.");
        } else {
            self.queries.attach()?;
            self.notify(NotificationLevel::Info, "Updates resumed.");
        }
        info!(paused = self.updates_paused, "updates toggled");
        Ok(())
    }

    pub fn refresh(&mut self) -> Result<(), CacheError> {
        if self.updates_paused {
            self.notify(NotificationLevel::Warning, "Updates are paused; press p to resume.");
            return Ok(());
        }
        self.queries.refetch_all()
    }

    pub fn open_form(&mut self) {
        if self.form.is_none() {
            self.form = Some(FormState::default());
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn handle_form_action(&mut self, action: FormAction, events: &mpsc::Sender<TuiEvent>) {
        match action {
            FormAction::Submit => {
                self.submit_form(events);
            }
            FormAction::Close => self.close_form(),
            other => {
                let Some(form) = self.form.as_mut() else {
                    return;
                };
                match other {
                    FormAction::Input(c) => form.input(c),
                    FormAction::Backspace => form.backspace(),
                    FormAction::NextField => form.focus_next(),
                    FormAction::PrevField => form.focus_previous(),
                    FormAction::NextOption => form.cycle_type(true),
                    FormAction::PrevOption => form.cycle_type(false),
                    FormAction::Submit | FormAction::Close => {}
                }
            }
        }
    }

    /// Validate the form and, if it passes, start the create call.
    ///
    /// Invalid input never reaches the task source. Returns true if a
    /// create call was started; its outcome arrives as
    /// [`TuiEvent::TaskCreated`] on `events`.
    pub fn submit_form(&mut self, events: &mpsc::Sender<TuiEvent>) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        if form.submitting {
            return false;
        }
        let request = match form.form.validate() {
            Ok(request) => request,
            Err(errors) => {
                warn!(errors = %errors, "task form rejected");
                form.errors = Some(errors);
                return false;
            }
        };
        form.errors = None;
        form.submitting = true;

        let source = Arc::clone(&self.source);
        let events = events.clone();
        tokio::spawn(async move {
            let outcome = source
                .create_task(&request)
                .await
                .map_err(|err| err.to_string());
            if events.send(TuiEvent::TaskCreated(outcome)).await.is_err() {
                debug!("event loop closed, dropping create outcome");
            }
        });
        true
    }

    pub fn handle_task_created(&mut self, outcome: Result<Task, String>) {
        match outcome {
            Ok(task) => {
                info!(task_id = %task.id, "task created");
                self.form = None;
                self.queries.invalidate_all();
                self.notify(
                    NotificationLevel::Success,
                    format!("Task \"{}\" created.", task.name),
                );
            }
            Err(message) => {
                if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                }
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to create task: {}", message),
                );
            }
        }
    }
}
