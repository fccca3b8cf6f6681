//! Metric cards row.

use crate::state::App;
use crate::widgets::MetricCard;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    Frame,
};
use taskboard_core::DashboardMetrics;

pub const HEIGHT: u16 = 4;

struct CardDef {
    title: &'static str,
    caption: &'static str,
    value: fn(&DashboardMetrics) -> u32,
    destructive: bool,
}

const CARDS: [CardDef; 4] = [
    CardDef {
        title: "Total Tasks",
        caption: "All tracked tasks",
        value: |m| m.total_tasks,
        destructive: false,
    },
    CardDef {
        title: "Tasks Running",
        caption: "Live now",
        value: |m| m.running,
        destructive: false,
    },
    CardDef {
        title: "Completed Today",
        caption: "Finished successfully",
        value: |m| m.completed_today,
        destructive: false,
    },
    CardDef {
        title: "Failed Tasks",
        caption: "Needs attention",
        value: |m| m.failed,
        destructive: true,
    },
];

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let metrics = app.queries.metrics.data();
    let failed = app
        .queries
        .metrics
        .snapshot()
        .is_some_and(|entry| entry.is_error());
    let theme = &app.theme;

    for (def, column) in CARDS.iter().zip(columns.iter()) {
        let accent = if def.destructive { theme.error } else { theme.text };
        let border = if failed { theme.error } else { theme.border };
        let card = MetricCard {
            title: def.title,
            value: metrics.map(def.value),
            caption: def.caption,
            value_style: Style::default().fg(accent),
            caption_style: Style::default().fg(theme.text_dim),
            border_style: Style::default().fg(border),
        };
        card.render(f, *column);
    }
}
