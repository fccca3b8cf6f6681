//! Headline number card.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SKELETON_VALUE: &str = "▒▒▒";
const SKELETON_CAPTION: &str = "▒▒▒▒▒▒▒▒";

pub struct MetricCard<'a> {
    pub title: &'a str,
    /// `None` renders the loading skeleton.
    pub value: Option<u32>,
    pub caption: &'a str,
    pub value_style: Style,
    pub caption_style: Style,
    pub border_style: Style,
}

impl<'a> MetricCard<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let (value, caption) = match self.value {
            Some(value) => (value.to_string(), self.caption.to_string()),
            None => (SKELETON_VALUE.to_string(), SKELETON_CAPTION.to_string()),
        };
        let lines = vec![
            Line::from(Span::styled(value, self.value_style.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(caption, self.caption_style)),
        ];
        let card = Paragraph::new(lines).alignment(Alignment::Left).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(card, area);
    }
}
