//! View rendering dispatch.

pub mod form;
pub mod metrics;
pub mod tasks;

use crate::notifications::NotificationLevel;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(metrics::HEIGHT),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    metrics::render(f, app, layout[1]);
    tasks::render(f, app, layout[2]);
    render_footer(f, app, layout[3]);

    if let Some(form) = &app.form {
        form::render(f, app, form, centered_rect(60, 18, f.size()));
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mode = if app.updates_paused {
        Span::styled("PAUSED", Style::default().fg(app.theme.warning))
    } else {
        Span::styled("LIVE", Style::default().fg(app.theme.success))
    };
    let updated = app
        .queries
        .metrics
        .snapshot()
        .and_then(|entry| entry.updated_at)
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let line = Line::from(vec![
        Span::styled("Dashboard", Style::default().fg(app.theme.primary)),
        Span::raw(" | "),
        mode,
        Span::styled(
            format!(" | Last update: {}", updated),
            Style::default().fg(app.theme.text_dim),
        ),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border))
            .title("Taskboard"),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = if app.form.is_some() {
        "Tab/Shift-Tab field • ←/→ type • Enter submit • Esc close"
    } else {
        "j/k move • r refresh • n new task • p pause • q quit"
    };
    let (text, style) = if let Some(note) = app.notifications.last() {
        let color = match note.level {
            NotificationLevel::Info => app.theme.info,
            NotificationLevel::Warning => app.theme.warning,
            NotificationLevel::Error => app.theme.error,
            NotificationLevel::Success => app.theme.success,
        };
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(color),
        )
    } else {
        ("Ready.".to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(help))
        .style(style);
    f.render_widget(footer, area);
}

/// Rectangle of `width_percent` by `height` rows centered in `area`.
pub fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
