//! Dashboard palette and status colors.

use ratatui::style::{Color, Modifier, Style};
use taskboard_core::{TaskStatus, TaskType};

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl Theme {
    pub fn dashboard() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            secondary: Color::Rgb(255, 0, 255),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }
}

pub fn task_status_color(status: TaskStatus, theme: &Theme) -> Color {
    match status {
        TaskStatus::Pending => theme.text_dim,
        TaskStatus::Running => theme.primary,
        TaskStatus::Completed => theme.success,
        TaskStatus::Failed => theme.error,
    }
}

/// Badge style for a status cell. Failed and completed are filled, the
/// others outlined.
pub fn task_status_badge(status: TaskStatus, theme: &Theme) -> Style {
    let color = task_status_color(status, theme);
    match status {
        TaskStatus::Completed | TaskStatus::Failed => Style::default()
            .fg(theme.bg)
            .bg(color)
            .add_modifier(Modifier::BOLD),
        TaskStatus::Running => Style::default().fg(color).add_modifier(Modifier::BOLD),
        TaskStatus::Pending => Style::default().fg(color),
    }
}

pub fn task_type_color(task_type: TaskType, theme: &Theme) -> Color {
    match task_type {
        TaskType::Email => theme.primary,
        TaskType::Notification => theme.secondary,
        TaskType::Report => theme.info,
        TaskType::Maintenance => theme.warning,
    }
}

pub fn priority_color(priority: u8, theme: &Theme) -> Color {
    if priority >= 8 {
        theme.error
    } else if priority >= 4 {
        theme.warning
    } else {
        theme.text_dim
    }
}
