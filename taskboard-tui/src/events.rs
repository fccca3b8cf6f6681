//! Event types for the dashboard event loop.

use crossterm::event::KeyEvent;
use taskboard_core::Task;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Outcome of a create-task call started from the form.
    TaskCreated(Result<Task, String>),
}
