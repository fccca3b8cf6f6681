//! Create-task form modal.

use crate::state::{App, FormState};
use crate::widgets::FormFieldWidget;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use taskboard_core::FormField;

pub fn render(f: &mut Frame<'_>, app: &App, form: &FormState, area: Rect) {
    f.render_widget(Clear, area);
    let title = if form.submitting { "Create Task (saving...)" } else { "Create Task" };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FormFieldWidget::HEIGHT),
            Constraint::Length(FormFieldWidget::HEIGHT),
            Constraint::Length(FormFieldWidget::HEIGHT),
            Constraint::Min(0),
        ])
        .split(inner);

    let type_value = match form.form.task_type {
        Some(task_type) => format!("< {} >", task_type),
        None => "< select >".to_string(),
    };
    let fields = [
        (FormField::Name, "Task Name", form.form.name.clone()),
        (FormField::Type, "Task Type", type_value),
        (FormField::Priority, "Priority (1-10)", form.form.priority.clone()),
    ];

    for ((field, label, value), row) in fields.into_iter().zip(rows.iter()) {
        let widget = FormFieldWidget {
            label,
            value,
            focused: form.focus == field,
            error: form.error_for(field),
            style: Style::default().fg(app.theme.border),
            focus_style: Style::default().fg(app.theme.primary),
            error_style: Style::default().fg(app.theme.error),
        };
        widget.render(f, *row);
    }

    let hint = Paragraph::new("Enter to create • Esc to cancel")
        .style(Style::default().fg(app.theme.text_dim));
    f.render_widget(hint, rows[3]);
}
