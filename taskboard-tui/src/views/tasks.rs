//! Recent tasks table with a detail panel for the selection.

use crate::state::App;
use crate::theme::{priority_color, task_status_badge, task_type_color};
use crate::widgets::DetailPanel;
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use taskboard_core::Task;

pub const LOADING_TEXT: &str = "Loading tasks...";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .title("Recent Tasks")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let query = &app.queries.tasks;
    if query.data().is_none() {
        let message = match query.snapshot().and_then(|entry| entry.error_message()) {
            Some(error) => Span::styled(
                format!("Error fetching tasks: {}", error),
                Style::default().fg(app.theme.error),
            ),
            None => Span::styled(LOADING_TEXT, Style::default().fg(app.theme.text_dim)),
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let rows: Vec<Row> = app.tasks().iter().map(|task| task_row(app, task)).collect();
    let header = Row::new(["Task Name", "Type", "Status", "Priority", "Created At"])
        .style(Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Min(20),
        Constraint::Length(13),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(19),
    ];

    let mut title = "Recent Tasks".to_string();
    if let Some(error) = query.snapshot().and_then(|entry| entry.error_message()) {
        title = format!("Recent Tasks (refresh failed: {})", error);
    }
    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .highlight_style(Style::default().bg(app.theme.bg_highlight))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(app.selected_index());
    f.render_stateful_widget(table, columns[0], &mut state);

    render_detail_panel(f, app, columns[1]);
}

fn task_row<'a>(app: &App, task: &'a Task) -> Row<'a> {
    let theme = &app.theme;
    Row::new(vec![
        Cell::from(task.name.as_str()),
        Cell::from(Span::styled(
            task.task_type.as_str(),
            Style::default().fg(task_type_color(task.task_type, theme)),
        )),
        Cell::from(Span::styled(
            format!(" {} ", task.status),
            task_status_badge(task.status, theme),
        )),
        Cell::from(Span::styled(
            task.priority.to_string(),
            Style::default().fg(priority_color(task.priority, theme)),
        )),
        Cell::from(
            task.created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
    ])
}

fn render_detail_panel(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mut fields = Vec::new();
    if let Some(task) = app.selected() {
        fields.push(("ID", Span::raw(task.id.clone())));
        fields.push(("Name", Span::raw(task.name.clone())));
        fields.push(("Type", Span::raw(task.task_type.to_string())));
        fields.push((
            "Status",
            Span::styled(task.status.to_string(), task_status_badge(task.status, &app.theme)),
        ));
        fields.push(("Priority", Span::raw(task.priority.to_string())));
        fields.push(("Retries", Span::raw(task.retries.to_string())));
        fields.push(("Created", Span::raw(task.created_at.to_rfc3339())));
    }

    let detail = DetailPanel {
        title: "Details",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border),
    };
    detail.render(f, area);
}
