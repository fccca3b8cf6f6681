//! Keybinding definitions for the dashboard.
//!
//! Two keymaps: the dashboard map, and the form map used while the
//! create-task form is open (where printable keys are text input).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    NewTask,
    MoveUp,
    MoveDown,
    PauseUpdates,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Input(char),
    Backspace,
    NextField,
    PrevField,
    NextOption,
    PrevOption,
    Submit,
    Close,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;
    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('n') => Some(Action::NewTask),
        KeyCode::Char('p') => Some(Action::PauseUpdates),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Esc => Some(Action::Cancel),
        _ => None,
    }
}

pub fn map_form_key(event: KeyEvent) -> Option<FormAction> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;
    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(FormAction::Close),
            _ => None,
        };
    }

    match code {
        KeyCode::Esc => Some(FormAction::Close),
        KeyCode::Enter => Some(FormAction::Submit),
        KeyCode::Tab | KeyCode::Down => Some(FormAction::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(FormAction::PrevField),
        KeyCode::Right => Some(FormAction::NextOption),
        KeyCode::Left => Some(FormAction::PrevOption),
        KeyCode::Backspace => Some(FormAction::Backspace),
        KeyCode::Char(c) => Some(FormAction::Input(c)),
        _ => None,
    }
}
