//! Single-line form field with focus and error display.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct FormFieldWidget<'a> {
    pub label: &'a str,
    pub value: String,
    pub focused: bool,
    pub error: Option<&'a str>,
    pub style: Style,
    pub focus_style: Style,
    pub error_style: Style,
}

impl<'a> FormFieldWidget<'a> {
    /// Rows needed: the bordered input plus one for an error line.
    pub const HEIGHT: u16 = 4;

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let border_style = match (self.focused, self.error.is_some()) {
            (_, true) => self.error_style,
            (true, false) => self.focus_style,
            (false, false) => self.style,
        };
        let cursor = if self.focused { "_" } else { "" };
        let mut lines = vec![Line::from(Span::raw(format!("{}{}", self.value, cursor)))];
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(error.to_string(), self.error_style)));
        }
        let widget = Paragraph::new(lines).block(
            Block::default()
                .title(self.label)
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        f.render_widget(widget, area);
    }
}
